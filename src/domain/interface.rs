use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vendor::UNKNOWN_VENDOR;

/// Traffic direction on an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rx,
    Tx,
}

impl Direction {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Rx => "rx",
            Self::Tx => "tx",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// One network interface at one polling tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSample {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub bytes_all: u64,
    pub link_speed_bps: u64,
    pub is_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    pub vendor: String,
    pub timestamp: DateTime<Utc>,
}

impl InterfaceSample {
    pub fn new(name: impl Into<String>, bytes_sent: u64, bytes_recv: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            bytes_sent,
            bytes_recv,
            bytes_all: bytes_sent.saturating_add(bytes_recv),
            link_speed_bps: 0,
            is_up: true,
            mac_address: None,
            vendor: UNKNOWN_VENDOR.to_string(),
            timestamp,
        }
    }

    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }

    pub fn with_link(mut self, is_up: bool, link_speed_bps: u64) -> Self {
        self.is_up = is_up;
        self.link_speed_bps = link_speed_bps;
        self
    }

    pub fn with_mac_address(mut self, mac_address: Option<String>) -> Self {
        self.mac_address = mac_address;
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Name without the `:label` suffix of virtual interfaces (`eth0:1` -> `eth0`)
    pub fn real_name(&self) -> &str {
        real_interface_name(&self.name)
    }

    /// Alias if configured, else the real interface name
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.real_name())
    }
}

pub fn real_interface_name(name: &str) -> &str {
    name.split(':').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_all_is_sum() {
        let sample = InterfaceSample::new("eth0", 300, 700, Utc::now());
        assert_eq!(sample.bytes_all, 1000);
        assert_eq!(sample.vendor, UNKNOWN_VENDOR);
    }

    #[test]
    fn test_display_name() {
        let sample = InterfaceSample::new("eth0:1", 0, 0, Utc::now());
        assert_eq!(sample.real_name(), "eth0");
        assert_eq!(sample.display_name(), "eth0");

        let aliased = sample.with_alias(Some("Uplink".to_string()));
        assert_eq!(aliased.display_name(), "Uplink");
    }
}
