use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{AlertClassifier, SpeedBands, ThresholdSet};

/// Locations searched for the OUI database when none is configured
const OUI_CANDIDATES: [&str; 3] = [
    "ieee-oui.txt",
    "/usr/share/arp-scan/ieee-oui.txt",
    "/usr/local/share/arp-scan/ieee-oui.txt",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid rules file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid rule: {0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub poll_interval: u64,
    pub sys_path: PathBuf,
    pub oui_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("NANONET_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            poll_interval: env::var("NANONET_POLL_INTERVAL")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(2),
            sys_path: env::var("NANONET_SYS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/sys")),
            oui_path: env::var("NANONET_OUI_PATH").ok().map(PathBuf::from),
            rules_path: env::var("NANONET_RULES_PATH").ok().map(PathBuf::from),
            log_level: env::var("NANONET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    /// OUI database paths to try, in order
    pub fn oui_candidates(&self) -> Vec<PathBuf> {
        match &self.oui_path {
            Some(path) => vec![path.clone()],
            None => OUI_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Per-interface display and alert rules, read from a TOML file:
///
/// ```toml
/// hide = ["lo", "docker0"]
///
/// [aliases]
/// wlan0 = "WiFi"
///
/// [bands]          # percent of link speed
/// careful = 50.0
/// warning = 70.0
/// critical = 90.0
///
/// [thresholds.eth0_rx]   # bits per second
/// careful = 50000000.0
/// warning = 70000000.0
/// critical = 90000000.0
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkRules {
    pub hide: HashSet<String>,
    pub aliases: HashMap<String, String>,
    pub bands: SpeedBands,
    pub thresholds: ThresholdSet,
}

impl NetworkRules {
    /// Load rules from `path`, or defaults when no path is configured
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    /// Parse and validate rules from a string
    pub fn load_from_str(s: &str) -> Result<Self, ConfigError> {
        let rules: NetworkRules = toml::from_str(s)?;
        rules.validate()?;
        Ok(rules)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let bands = &self.bands.0;
        if !bands.is_ascending() || bands.critical > 100.0 {
            return Err(ConfigError::Invalid(format!(
                "bands must satisfy 0 < careful <= warning <= critical <= 100, got {}/{}/{}",
                bands.careful, bands.warning, bands.critical
            )));
        }

        for (key, thresholds) in &self.thresholds {
            if !(key.ends_with("_rx") || key.ends_with("_tx")) {
                return Err(ConfigError::Invalid(format!(
                    "threshold key {:?} must end with _rx or _tx",
                    key
                )));
            }
            if !thresholds.is_ascending() {
                return Err(ConfigError::Invalid(format!(
                    "thresholds.{} must satisfy 0 < careful <= warning <= critical",
                    key
                )));
            }
        }

        Ok(())
    }

    pub fn is_hidden(&self, interface_name: &str) -> bool {
        self.hide.contains(interface_name)
    }

    pub fn alias_for(&self, interface_name: &str) -> Option<String> {
        self.aliases.get(interface_name).cloned()
    }

    pub fn classifier(&self) -> AlertClassifier {
        AlertClassifier::new(self.thresholds.clone(), self.bands)
    }
}
