use aws_sdk_s3::Client as S3Client;
use lambda_runtime::tracing;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::ArchiveError;

// Everything but unreserved characters and the path separator is escaped.
const COPY_SOURCE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Found,
    NotFound,
}

/// HEADs `bucket/key`. Only a not-found answer maps to [`Presence::NotFound`].
pub async fn probe(s3_client: &S3Client, bucket: &str, key: &str) -> Result<Presence, ArchiveError> {
    match s3_client.head_object().bucket(bucket).key(key).send().await {
        Ok(_) => Ok(Presence::Found),
        Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => {
            Ok(Presence::NotFound)
        }
        Err(err) => Err(ArchiveError::ExistenceCheck {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: Box::new(err),
        }),
    }
}

pub(crate) fn copy_source(bucket: &str, key: &str) -> String {
    format!("{}/{}", bucket, utf8_percent_encode(key, COPY_SOURCE))
}

pub async fn copy(
    s3_client: &S3Client,
    source_bucket: &str,
    source_key: &str,
    dest_bucket: &str,
    dest_key: &str,
) -> Result<(), ArchiveError> {
    s3_client
        .copy_object()
        .bucket(dest_bucket)
        .key(dest_key)
        .copy_source(copy_source(source_bucket, source_key))
        .send()
        .await
        .map_err(|err| {
            tracing::error!(
                error = %err,
                "Error getting object {} from bucket {}.",
                source_key,
                source_bucket
            );
            ArchiveError::Copy {
                source_bucket: source_bucket.to_string(),
                source_key: source_key.to_string(),
                dest_bucket: dest_bucket.to_string(),
                dest_key: dest_key.to_string(),
                source: Box::new(err),
            }
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::head_object::{HeadObjectError, HeadObjectOutput};
    use aws_sdk_s3::types::error::NotFound;
    use aws_smithy_mocks::{mock, mock_client};

    #[test]
    fn copy_source_escapes_key_but_keeps_slashes() {
        assert_eq!(
            copy_source("backups", "latest/proj-a/my file+1.txt"),
            "backups/latest/proj-a/my%20file%2B1.txt"
        );
        assert_eq!(copy_source("backups", "latest/p/a_b.c~d"), "backups/latest/p/a_b.c~d");
    }

    #[tokio::test]
    async fn probe_reports_found() {
        let head = mock!(aws_sdk_s3::Client::head_object)
            .match_requests(|req| req.bucket() == Some("archive") && req.key() == Some("k"))
            .then_output(|| HeadObjectOutput::builder().content_length(10).build());
        let s3 = mock_client!(aws_sdk_s3, [&head]);
        assert_eq!(probe(&s3, "archive", "k").await.unwrap(), Presence::Found);
        assert_eq!(head.num_calls(), 1);
    }

    #[tokio::test]
    async fn probe_reports_not_found() {
        let head = mock!(aws_sdk_s3::Client::head_object)
            .then_error(|| HeadObjectError::NotFound(NotFound::builder().build()));
        let s3 = mock_client!(aws_sdk_s3, [&head]);
        assert_eq!(probe(&s3, "archive", "k").await.unwrap(), Presence::NotFound);
    }

    #[tokio::test]
    async fn probe_propagates_other_failures() {
        let head = mock!(aws_sdk_s3::Client::head_object).then_error(|| {
            HeadObjectError::generic(ErrorMetadata::builder().code("Forbidden").build())
        });
        let s3 = mock_client!(aws_sdk_s3, [&head]);
        let err = probe(&s3, "archive", "k").await.unwrap_err();
        match err {
            ArchiveError::ExistenceCheck { bucket, key, .. } => {
                assert_eq!(bucket, "archive");
                assert_eq!(key, "k");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
