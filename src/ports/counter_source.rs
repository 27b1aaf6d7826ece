use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stats unavailable: {0}")]
    Unavailable(String),
}

/// Raw counters and metadata of one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInterface {
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub is_up: bool,
    /// Advertised link speed in bits per second, 0 if unknown
    pub speed_bps: u64,
    /// Link-layer address, if the interface has one
    pub mac_address: Option<String>,
}

/// Port for fetching cumulative interface counters
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// List all interfaces with their current counters
    async fn fetch_counters(&self) -> Result<Vec<RawInterface>, SourceError>;
}
