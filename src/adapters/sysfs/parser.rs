use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Mbps -> bits per second (binary megabit)
const MBPS_TO_BPS: u64 = 1_048_576;

fn read_counter(path: &Path) -> ParseResult<u64> {
    let content = fs::read_to_string(path)?;
    content
        .trim()
        .parse::<u64>()
        .map_err(|e| ParseError::Parse(format!("{}: {}", path.display(), e)))
}

/// Parse byte counters from /sys/class/net/{interface}/statistics
pub fn parse_byte_counters(stats_dir: &Path) -> ParseResult<(u64, u64)> {
    let rx_bytes = read_counter(&stats_dir.join("rx_bytes"))?;
    let tx_bytes = read_counter(&stats_dir.join("tx_bytes"))?;

    Ok((rx_bytes, tx_bytes))
}

/// Parse /sys/class/net/{interface}/operstate
///
/// `unknown` is reported by interfaces without carrier detection (loopback,
/// tunnels) that are nonetheless passing traffic.
pub fn parse_operstate(content: &str) -> bool {
    matches!(content.trim(), "up" | "unknown")
}

/// Parse /sys/class/net/{interface}/speed (Mbps, -1 when unknown)
pub fn parse_speed(content: &str) -> u64 {
    match content.trim().parse::<i64>() {
        Ok(mbps) if mbps > 0 => (mbps as u64).saturating_mul(MBPS_TO_BPS),
        _ => 0,
    }
}

/// Parse /sys/class/net/{interface}/address, ignoring empty or all-zero
/// addresses
pub fn parse_address(content: &str) -> Option<String> {
    let address = content.trim();
    let is_placeholder = address
        .chars()
        .all(|c| matches!(c, '0' | ':' | '-' | '.'));

    if address.is_empty() || is_placeholder {
        None
    } else {
        Some(address.to_string())
    }
}
