pub mod store;
pub mod sysfs;

pub use store::MemoryStore;
pub use sysfs::{SysfsConfig, SysfsCounterSource};
