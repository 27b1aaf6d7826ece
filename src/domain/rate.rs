use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::InterfaceSample;

/// Per-second byte rates between two consecutive samples of an interface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSample {
    pub recv_rate_per_sec: f64,
    pub sent_rate_per_sec: f64,
    pub all_rate_per_sec: f64,
}

impl RateSample {
    pub fn is_nonzero(&self) -> bool {
        self.recv_rate_per_sec > 0.0 || self.sent_rate_per_sec > 0.0
    }

    /// Receive rate in bits per second
    pub fn recv_bits_per_sec(&self) -> f64 {
        self.recv_rate_per_sec * 8.0
    }

    /// Send rate in bits per second
    pub fn sent_bits_per_sec(&self) -> f64 {
        self.sent_rate_per_sec * 8.0
    }
}

/// Keeps the previous sample of every interface to turn cumulative counters
/// into rates
#[derive(Debug, Default)]
pub struct RateTracker {
    previous: HashMap<String, InterfaceSample>,
}

impl RateTracker {
    /// Record `sample` for `name` and return the rate since the previous
    /// sample, if one can be computed.
    ///
    /// Returns `None` on the first observation, when no time has elapsed
    /// (the previous baseline is kept), and when a counter went backwards
    /// (the sample becomes the new baseline).
    pub fn update(&mut self, name: &str, sample: InterfaceSample, now: DateTime<Utc>) -> Option<RateSample> {
        let Some(previous) = self.previous.get(name) else {
            self.previous.insert(name.to_string(), sample);
            return None;
        };

        let elapsed = match (now - previous.timestamp).to_std() {
            Ok(elapsed) if !elapsed.is_zero() => elapsed.as_secs_f64(),
            _ => {
                debug!(interface = name, "No time elapsed since previous sample, skipping rate");
                return None;
            }
        };

        if sample.bytes_recv < previous.bytes_recv
            || sample.bytes_sent < previous.bytes_sent
            || sample.bytes_all < previous.bytes_all
        {
            debug!(
                interface = name,
                previous_recv = previous.bytes_recv,
                current_recv = sample.bytes_recv,
                previous_sent = previous.bytes_sent,
                current_sent = sample.bytes_sent,
                "Counter reset detected, rebaselining"
            );
            self.previous.insert(name.to_string(), sample);
            return None;
        }

        let rate = RateSample {
            recv_rate_per_sec: (sample.bytes_recv - previous.bytes_recv) as f64 / elapsed,
            sent_rate_per_sec: (sample.bytes_sent - previous.bytes_sent) as f64 / elapsed,
            all_rate_per_sec: (sample.bytes_all - previous.bytes_all) as f64 / elapsed,
        };
        self.previous.insert(name.to_string(), sample);

        Some(rate)
    }

    /// Drop cached samples of interfaces not in `names`
    pub fn retain(&mut self, names: &HashSet<String>) {
        self.previous.retain(|name, _| {
            let keep = names.contains(name);
            if !keep {
                debug!(interface = %name, "Interface disappeared, evicting baseline");
            }
            keep
        });
    }
}
