mod counters;
mod parser;

use std::path::PathBuf;

pub use counters::SysfsCounterSource;

/// Configuration for the sysfs mount (useful for Docker mounts)
#[derive(Debug, Clone)]
pub struct SysfsConfig {
    pub sys_path: PathBuf,
}

impl SysfsConfig {
    pub fn new(sys_path: impl Into<PathBuf>) -> Self {
        Self {
            sys_path: sys_path.into(),
        }
    }

    pub fn host() -> Self {
        Self::new("/sys")
    }

    pub fn net_class_path(&self) -> PathBuf {
        self.sys_path.join("class/net")
    }
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self::host()
    }
}
