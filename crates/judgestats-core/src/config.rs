use crate::errors::ConfigError;
use crate::report::variance::DEFAULT_TOP_N;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILE: &str = "judgestats.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError(format!(
                "unknown output format '{}' (expected text|json)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub db: PathBuf,
    pub top: usize,
    pub format: OutputFormat,
    pub log_level: String,
    /// Keys present in the file but not understood; reported once logging is up.
    #[serde(skip)]
    pub ignored_keys: Vec<String>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            db: PathBuf::from("judgings.db"),
            top: DEFAULT_TOP_N,
            format: OutputFormat::Text,
            log_level: "warn".to_string(),
            ignored_keys: Vec::new(),
        }
    }
}

impl StatsConfig {
    pub fn apply_env(self) -> Self {
        self.with_env(|k| std::env::var(k).ok())
    }

    pub fn with_env(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = get("JUDGESTATS_DB") {
            self.db = PathBuf::from(v);
        }
        if let Some(v) = get("JUDGESTATS_LOG") {
            self.log_level = v;
        }
        self
    }
}

pub fn load_config(path: &Path) -> Result<StatsConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    parse_config(&raw)
}

pub fn parse_config(raw: &str) -> Result<StatsConfig, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(StatsConfig::default());
    }

    let mut ignored_keys = Vec::new();
    let deserializer = serde_yaml::Deserializer::from_str(raw);
    let mut cfg: StatsConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.push(path.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

    if cfg.top == 0 {
        return Err(ConfigError("top must be at least 1".into()));
    }
    cfg.ignored_keys = ignored_keys;
    Ok(cfg)
}

/// An explicitly named file must exist; the default file is optional.
pub fn load_or_default(explicit: Option<&Path>) -> Result<StatsConfig, ConfigError> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                load_config(path)
            } else {
                Ok(StatsConfig::default())
            }
        }
    }
}
