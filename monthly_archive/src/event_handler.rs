use aws_lambda_events::event::sns::SnsEvent;
use aws_sdk_s3::Client as S3Client;
use chrono::{Local, NaiveDate};
use lambda_runtime::{tracing, Error, LambdaEvent};

use crate::archive_key::{plan_targets, DateStamp, ParsedPath, Target};
use crate::error::ArchiveError;
use crate::notification::Notification;
use crate::settings::Settings;
use crate::storage::{self, Presence};

pub(crate) const SUCCESS: &str = "Success";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Copied,
    Skipped,
}

pub async fn archive_object(
    s3_client: &S3Client,
    settings: &Settings,
    notification: &Notification,
    today: NaiveDate,
) -> Result<Vec<(Target, TargetOutcome)>, ArchiveError> {
    let path = ParsedPath::parse(&settings.key_prefix, &notification.key);
    tracing::info!(
        bucket = %notification.bucket,
        key = %notification.key,
        size = notification.size,
        "Archiving object"
    );
    tracing::info!("Project: {}", path.project);
    tracing::info!("FileName: {}", path.file_name);
    tracing::info!("Name: {}", path.name);
    tracing::info!("Extension: {}", path.extension);

    let stamp = DateStamp::new(today);
    let targets = plan_targets(
        &settings.target_bucket,
        &settings.key_prefix,
        &settings.granularities,
        &path,
        &stamp,
    );
    tracing::info!(
        "Targets: {}",
        serde_json::to_string_pretty(&targets).unwrap_or_else(|_| format!("{targets:?}"))
    );

    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = match storage::probe(s3_client, &target.bucket, &target.key).await? {
            Presence::Found => {
                tracing::info!("Skipping {}/{}, it already exists.", target.bucket, target.key);
                TargetOutcome::Skipped
            }
            Presence::NotFound => {
                tracing::info!(
                    "Copying from {}/{} to {}/{} ...",
                    notification.bucket,
                    notification.key,
                    target.bucket,
                    target.key
                );
                storage::copy(
                    s3_client,
                    &notification.bucket,
                    &notification.key,
                    &target.bucket,
                    &target.key,
                )
                .await?;
                TargetOutcome::Copied
            }
        };
        outcomes.push((target, outcome));
    }
    Ok(outcomes)
}

pub(crate) async fn function_handler(
    event: LambdaEvent<SnsEvent>,
    s3_client: &S3Client,
    settings: &Settings,
) -> Result<&'static str, Error> {
    let notification = Notification::from_sns(&event.payload)?;
    let today = Local::now().date_naive();
    let outcomes = archive_object(s3_client, settings, &notification, today).await?;
    let copied = outcomes
        .iter()
        .filter(|(_, outcome)| *outcome == TargetOutcome::Copied)
        .count();
    tracing::info!(
        copied,
        skipped = outcomes.len() - copied,
        "Archived {}/{}",
        notification.bucket,
        notification.key
    );
    Ok(SUCCESS)
}
