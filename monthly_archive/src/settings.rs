use std::env;

use crate::archive_key::Granularity;
use crate::error::ArchiveError;

const TARGET_BUCKET: &str = "target_bucket";
const KEY_PREFIX: &str = "key_prefix";
const GRANULARITIES: &str = "archive_granularities";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target_bucket: String,
    /// Prepended to both the `latest/` source layout and every archive key.
    pub key_prefix: String,
    pub granularities: Vec<Granularity>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ArchiveError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ArchiveError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target_bucket = lookup(TARGET_BUCKET)
            .filter(|bucket| !bucket.is_empty())
            .ok_or(ArchiveError::MissingSetting(TARGET_BUCKET))?;
        let key_prefix = lookup(KEY_PREFIX).unwrap_or_default();
        let granularities = match lookup(GRANULARITIES) {
            Some(raw) => parse_granularities(&raw)?,
            None => vec![Granularity::Monthly],
        };

        Ok(Self {
            target_bucket,
            key_prefix,
            granularities,
        })
    }
}

fn parse_granularities(raw: &str) -> Result<Vec<Granularity>, ArchiveError> {
    let mut granularities = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let granularity = name
            .parse::<Granularity>()
            .map_err(|_| ArchiveError::InvalidSetting {
                name: GRANULARITIES,
                value: name.to_string(),
            })?;
        if !granularities.contains(&granularity) {
            granularities.push(granularity);
        }
    }
    if granularities.is_empty() {
        return Err(ArchiveError::InvalidSetting {
            name: GRANULARITIES,
            value: raw.to_string(),
        });
    }
    Ok(granularities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, ArchiveError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_monthly_without_prefix() {
        let settings = settings_from(&[("target_bucket", "archive")]).unwrap();
        assert_eq!(settings.target_bucket, "archive");
        assert_eq!(settings.key_prefix, "");
        assert_eq!(settings.granularities, vec![Granularity::Monthly]);
    }

    #[test]
    fn missing_target_bucket_is_an_error() {
        let err = settings_from(&[("key_prefix", "backups/")]).unwrap_err();
        assert!(matches!(err, ArchiveError::MissingSetting("target_bucket")));

        let err = settings_from(&[("target_bucket", "")]).unwrap_err();
        assert!(matches!(err, ArchiveError::MissingSetting("target_bucket")));
    }

    #[test]
    fn parses_granularity_list_in_order() {
        let settings = settings_from(&[
            ("target_bucket", "archive"),
            ("key_prefix", "backups/"),
            ("archive_granularities", "yearly, monthly,daily,monthly"),
        ])
        .unwrap();
        assert_eq!(settings.key_prefix, "backups/");
        assert_eq!(
            settings.granularities,
            vec![Granularity::Yearly, Granularity::Monthly, Granularity::Daily]
        );
    }

    #[test]
    fn rejects_unknown_granularity() {
        let err = settings_from(&[
            ("target_bucket", "archive"),
            ("archive_granularities", "monthly,hourly"),
        ])
        .unwrap_err();
        match err {
            ArchiveError::InvalidSetting { name, value } => {
                assert_eq!(name, "archive_granularities");
                assert_eq!(value, "hourly");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(settings_from(&[("target_bucket", "archive"), ("archive_granularities", " , ")]).is_err());
    }
}
