use std::fs;

use async_trait::async_trait;
use tracing::debug;

use crate::ports::{CounterSource, RawInterface, SourceError};

use super::parser;
use super::SysfsConfig;

/// Counter source reading /sys/class/net
pub struct SysfsCounterSource {
    config: SysfsConfig,
}

impl SysfsCounterSource {
    pub fn new(config: SysfsConfig) -> Self {
        Self { config }
    }

    fn read_interface(&self, name: String, dir: &std::path::Path) -> Option<RawInterface> {
        let (bytes_recv, bytes_sent) = match parser::parse_byte_counters(&dir.join("statistics")) {
            Ok(counters) => counters,
            Err(e) => {
                debug!(interface = %name, error = %e, "Skipping interface without counters");
                return None;
            }
        };

        let is_up = fs::read_to_string(dir.join("operstate"))
            .map(|s| parser::parse_operstate(&s))
            .unwrap_or(false);

        // Reading speed fails with EINVAL on interfaces that are down
        let speed_bps = fs::read_to_string(dir.join("speed"))
            .map(|s| parser::parse_speed(&s))
            .unwrap_or(0);

        let mac_address = fs::read_to_string(dir.join("address"))
            .ok()
            .and_then(|s| parser::parse_address(&s));

        Some(RawInterface {
            name,
            bytes_sent,
            bytes_recv,
            is_up,
            speed_bps,
            mac_address,
        })
    }
}

#[async_trait]
impl CounterSource for SysfsCounterSource {
    async fn fetch_counters(&self) -> Result<Vec<RawInterface>, SourceError> {
        let net_class_path = self.config.net_class_path();
        if !net_class_path.is_dir() {
            return Err(SourceError::Unavailable(format!(
                "{} is not a directory",
                net_class_path.display()
            )));
        }

        let mut interfaces = Vec::new();

        for entry in fs::read_dir(&net_class_path)? {
            let entry = entry?;
            let interface_name = entry.file_name().to_string_lossy().to_string();

            if let Some(interface) = self.read_interface(interface_name, &entry.path()) {
                interfaces.push(interface);
            }
        }

        interfaces.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(interfaces)
    }
}
