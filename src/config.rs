use crate::error::{Result, TranstatError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub github_token: String,
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub except: String,
    #[serde(default)]
    pub duration: DurationConfig,
    pub chart: ChartConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
    pub trans_label: String,
    pub branch: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DurationConfig {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    pub series: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_record_delay_ms")]
    pub record_delay_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay_ms(),
            record_delay_ms: default_record_delay_ms(),
        }
    }
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_record_delay_ms() -> u64 {
    2000
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TranstatError::Config(format!(
                "cannot read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: Config = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("github_token", &self.github_token),
            ("repository.owner", &self.repository.owner),
            ("repository.name", &self.repository.name),
            ("repository.trans_label", &self.repository.trans_label),
            ("repository.branch", &self.repository.branch),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(TranstatError::Config(format!("{key} must not be empty")));
            }
        }
        // Fail on malformed values before any network activity.
        self.excluded_numbers()?;
        self.window()?;
        Ok(())
    }

    /// Pull request numbers excluded from reporting, given in the config as
    /// a comma-joined string of numeric literals.
    pub fn excluded_numbers(&self) -> Result<BTreeSet<u64>> {
        let mut numbers = BTreeSet::new();
        for part in self.except.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let number = part.parse::<u64>().map_err(|_| {
                TranstatError::Config(format!(
                    "except: expected a comma-joined list of pull request numbers, got {part:?}"
                ))
            })?;
            numbers.insert(number);
        }
        Ok(numbers)
    }

    /// Report window bounds. An empty or absent bound comes back as `None`;
    /// the report layer decides what to substitute.
    pub fn window(&self) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        Ok((
            parse_bound("duration.start", &self.duration.start)?,
            parse_bound("duration.end", &self.duration.end)?,
        ))
    }
}

fn parse_bound(key: &str, raw: &str) -> Result<Option<DateTime<Utc>>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let parsed = DateTime::parse_from_rfc3339(trimmed).map_err(|e| {
        TranstatError::Config(format!("{key}: invalid RFC3339 timestamp {trimmed:?}: {e}"))
    })?;
    Ok(Some(parsed.with_timezone(&Utc)))
}
