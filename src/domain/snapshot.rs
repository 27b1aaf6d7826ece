use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AlertLevel, InterfaceSample, LinkAlerts, RateSample};

/// One interface as handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub interface_name: String,
    pub alias: Option<String>,
    pub display_name: String,
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    pub is_up: bool,
    pub speed_bps: u64,
    pub bytes_recv: u64,
    pub bytes_sent: u64,
    pub bytes_all: u64,
    pub bytes_recv_rate_per_sec: f64,
    pub bytes_sent_rate_per_sec: f64,
    pub bytes_all_rate_per_sec: f64,
    pub rx_alert: AlertLevel,
    pub tx_alert: AlertLevel,
    pub timestamp: DateTime<Utc>,
}

/// Compose the display record of an interface.
///
/// Interfaces that are down, that have no rate yet, or whose rates have never
/// departed from zero (`ever_nonzero`, tracked by the caller) are suppressed.
pub fn build_snapshot(
    sample: &InterfaceSample,
    rate: Option<&RateSample>,
    alerts: LinkAlerts,
    ever_nonzero: bool,
) -> Option<DisplayRecord> {
    if !sample.is_up || !ever_nonzero {
        return None;
    }
    let rate = rate?;

    Some(DisplayRecord {
        interface_name: sample.name.clone(),
        alias: sample.alias.clone(),
        display_name: sample.display_name().to_string(),
        vendor: sample.vendor.clone(),
        mac_address: sample.mac_address.clone(),
        is_up: sample.is_up,
        speed_bps: sample.link_speed_bps,
        bytes_recv: sample.bytes_recv,
        bytes_sent: sample.bytes_sent,
        bytes_all: sample.bytes_all,
        bytes_recv_rate_per_sec: rate.recv_rate_per_sec,
        bytes_sent_rate_per_sec: rate.sent_rate_per_sec,
        bytes_all_rate_per_sec: rate.all_rate_per_sec,
        rx_alert: alerts.rx,
        tx_alert: alerts.tx,
        timestamp: sample.timestamp,
    })
}
