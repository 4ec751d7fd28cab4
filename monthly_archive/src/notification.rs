use aws_lambda_events::event::s3::S3Event;
use aws_lambda_events::event::sns::SnsEvent;

use crate::archive_key::decode_key;
use crate::error::ArchiveError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub bucket: String,
    pub key: String,
    pub size: i64,
}

impl Notification {
    /// Unwraps the S3 event carried as the message of the first SNS record.
    pub fn from_sns(event: &SnsEvent) -> Result<Self, ArchiveError> {
        let message = event
            .records
            .first()
            .map(|record| record.sns.message.as_str())
            .ok_or(ArchiveError::MalformedEvent("no SNS record"))?;
        let s3_event: S3Event = serde_json::from_str(message)?;
        Self::from_s3(&s3_event)
    }

    pub fn from_s3(event: &S3Event) -> Result<Self, ArchiveError> {
        let record = event
            .records
            .first()
            .ok_or(ArchiveError::MalformedEvent("no S3 record"))?;
        let bucket = record
            .s3
            .bucket
            .name
            .clone()
            .ok_or(ArchiveError::MalformedEvent("missing bucket name"))?;
        let key = record
            .s3
            .object
            .key
            .as_deref()
            .map(decode_key)
            .ok_or(ArchiveError::MalformedEvent("missing object key"))?;
        let size = record
            .s3
            .object
            .size
            .ok_or(ArchiveError::MalformedEvent("missing object size"))?;

        Ok(Self { bucket, key, size })
    }
}
