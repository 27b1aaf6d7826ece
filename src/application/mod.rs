mod monitoring;

pub use monitoring::{spawn_poller, NetworkMonitor};
