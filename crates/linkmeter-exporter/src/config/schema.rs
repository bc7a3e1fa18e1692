use std::collections::HashSet;

use serde::Deserialize;

use linkmeter_core::error::{LinkMeterError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LinkMeterError::InvalidConfig("version must be 1".into()));
        }
        if self.sources.is_empty() {
            return Err(LinkMeterError::InvalidConfig(
                "sources must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !seen.insert(source.name.as_str()) {
                return Err(LinkMeterError::InvalidConfig(format!(
                    "duplicate source name: {}",
                    source.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:9123".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Unique name, used as the metric name prefix and the write key.
    pub name: String,
    /// Router address (host or IP, without scheme or port).
    pub address: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl SourceConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_metric_prefix(&self.name) {
            return Err(LinkMeterError::InvalidConfig(format!(
                "sources[].name '{}' must match [a-zA-Z_][a-zA-Z0-9_]*",
                self.name
            )));
        }
        if self.address.is_empty() {
            return Err(LinkMeterError::InvalidConfig(
                "sources[].address must not be empty".into(),
            ));
        }
        if !(100..=60000).contains(&self.timeout_ms) {
            return Err(LinkMeterError::InvalidConfig(
                "sources[].timeout_ms must be between 100 and 60000".into(),
            ));
        }
        // Sub-second polling can never produce a rate (whole-second deltas).
        if self.interval_secs == 0 {
            return Err(LinkMeterError::InvalidConfig(
                "sources[].interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_timeout_ms() -> u64 {
    10000
}

fn default_interval_secs() -> u64 {
    30
}

fn is_metric_prefix(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
