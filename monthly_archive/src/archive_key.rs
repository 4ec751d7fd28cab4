use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use percent_encoding::percent_decode_str;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Latest,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Latest => "latest",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(Granularity::Latest),
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            "yearly" => Ok(Granularity::Yearly),
            _ => Err(()),
        }
    }
}

/// Decodes an S3 event key: `+` is a space, then UTF-8 percent-decoding.
pub fn decode_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub project: String,
    pub file_name: String,
    pub name: String,
    /// Includes the leading dot, empty when the file has none.
    pub extension: String,
}

impl ParsedPath {
    pub fn parse(prefix: &str, key: &str) -> Self {
        let file_name = key.rsplit('/').next().unwrap_or(key).to_string();
        let (name, extension) = split_extension(&file_name);

        let latest = format!("{prefix}latest/");
        let rest = key.strip_prefix(latest.as_str()).unwrap_or(key);
        let project = rest
            .strip_suffix(format!("/{file_name}").as_str())
            .unwrap_or(rest)
            .to_string();

        Self {
            project,
            name: name.to_string(),
            extension: extension.to_string(),
            file_name,
        }
    }
}

// Leading dots belong to the name: `.bashrc` has no extension.
fn split_extension(file_name: &str) -> (&str, &str) {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name.rfind('.') {
        Some(dot) if dot > leading_dots => file_name.split_at(dot),
        _ => (file_name, ""),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStamp {
    pub ymd: String,
    pub ym: String,
    pub year: String,
    pub week: String,
    pub weekday: String,
    pub month: String,
}

impl DateStamp {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            ymd: date.format("%Y-%m-%d").to_string(),
            ym: date.format("%Y-%m").to_string(),
            year: date.format("%Y").to_string(),
            week: date.format("%Y-%W").to_string(),
            weekday: date.format("%A").to_string(),
            month: date.format("%B").to_string(),
        }
    }
}

pub fn archive_key(
    prefix: &str,
    granularity: Granularity,
    path: &ParsedPath,
    stamp: &DateStamp,
) -> String {
    let ParsedPath {
        project,
        file_name,
        name,
        extension,
    } = path;
    match granularity {
        Granularity::Latest => format!("{prefix}latest/{project}/{file_name}"),
        Granularity::Daily => format!(
            "{prefix}daily/{project}/{name}_{}.{}{extension}",
            stamp.ymd, stamp.weekday
        ),
        Granularity::Weekly => format!("{prefix}weekly/{project}/{name}_{}{extension}", stamp.week),
        Granularity::Monthly => format!(
            "{prefix}monthly/{project}/{name}_{}.{}{extension}",
            stamp.ym, stamp.month
        ),
        Granularity::Yearly => format!("{prefix}yearly/{project}/{name}_{}{extension}", stamp.year),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub granularity: Granularity,
    pub bucket: String,
    pub key: String,
}

pub fn plan_targets(
    bucket: &str,
    prefix: &str,
    granularities: &[Granularity],
    path: &ParsedPath,
    stamp: &DateStamp,
) -> Vec<Target> {
    granularities
        .iter()
        .map(|&granularity| Target {
            granularity,
            bucket: bucket.to_string(),
            key: archive_key(prefix, granularity, path, stamp),
        })
        .collect()
}
