pub mod alert;
pub mod interface;
pub mod mac;
pub mod rate;
pub mod snapshot;
pub mod vendor;

pub use alert::{AlertClassifier, AlertLevel, LinkAlerts, SpeedBands, ThresholdSet};
pub use interface::InterfaceSample;
pub use mac::{normalize_mac, MacError};
pub use rate::{RateSample, RateTracker};
pub use snapshot::{build_snapshot, DisplayRecord};
pub use vendor::{VendorTable, UNKNOWN_VENDOR};
