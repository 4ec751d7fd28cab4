use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::copy_object::CopyObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("required setting `{0}` is not set")]
    MissingSetting(&'static str),

    #[error("invalid value `{value}` for setting `{name}`")]
    InvalidSetting { name: &'static str, value: String },

    #[error("SNS message is not a valid S3 event: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("malformed notification: {0}")]
    MalformedEvent(&'static str),

    #[error("failed to check s3://{bucket}/{key}")]
    ExistenceCheck {
        bucket: String,
        key: String,
        #[source]
        source: Box<SdkError<HeadObjectError>>,
    },

    #[error("failed to copy s3://{source_bucket}/{source_key} to s3://{dest_bucket}/{dest_key}")]
    Copy {
        source_bucket: String,
        source_key: String,
        dest_bucket: String,
        dest_key: String,
        #[source]
        source: Box<SdkError<CopyObjectError>>,
    },
}
