use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::interface::{real_interface_name, Direction, InterfaceSample};
use super::RateSample;

/// Alert severity of a measured rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Ok,
    Careful,
    Warning,
    Critical,
    /// No threshold applies; renderers leave it undecorated
    Default,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Careful => "CAREFUL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Default => "DEFAULT",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ascending alert boundaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub careful: f64,
    pub warning: f64,
    pub critical: f64,
}

impl Thresholds {
    pub fn new(careful: f64, warning: f64, critical: f64) -> Self {
        Self {
            careful,
            warning,
            critical,
        }
    }

    /// Highest boundary reached by `value`, or OK
    pub fn level_for(&self, value: f64) -> AlertLevel {
        if value >= self.critical {
            AlertLevel::Critical
        } else if value >= self.warning {
            AlertLevel::Warning
        } else if value >= self.careful {
            AlertLevel::Careful
        } else {
            AlertLevel::Ok
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.careful > 0.0 && self.careful <= self.warning && self.warning <= self.critical
    }
}

/// Percentages of link speed used when no explicit threshold is configured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeedBands(pub Thresholds);

impl SpeedBands {
    pub fn new(careful: f64, warning: f64, critical: f64) -> Self {
        Self(Thresholds::new(careful, warning, critical))
    }

    pub fn level_for(&self, rate_bits_per_sec: f64, link_speed_bps: u64) -> AlertLevel {
        let percent = rate_bits_per_sec * 100.0 / link_speed_bps as f64;
        self.0.level_for(percent)
    }
}

impl Default for SpeedBands {
    fn default() -> Self {
        Self::new(50.0, 70.0, 90.0)
    }
}

/// Configured thresholds keyed by `{interface}_{rx|tx}`, in bits per second
pub type ThresholdSet = HashMap<String, Thresholds>;

/// Lookup key of an interface direction in a [`ThresholdSet`]
pub fn threshold_key(interface_name: &str, direction: Direction) -> String {
    format!("{}_{}", real_interface_name(interface_name), direction.suffix())
}

/// Receive and transmit severities of one interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAlerts {
    pub rx: AlertLevel,
    pub tx: AlertLevel,
}

impl LinkAlerts {
    pub fn unclassified() -> Self {
        Self {
            rx: AlertLevel::Default,
            tx: AlertLevel::Default,
        }
    }
}

/// Classifies rates against configured thresholds, falling back to the link
/// speed
#[derive(Debug, Clone, Default)]
pub struct AlertClassifier {
    thresholds: ThresholdSet,
    bands: SpeedBands,
}

impl AlertClassifier {
    pub fn new(thresholds: ThresholdSet, bands: SpeedBands) -> Self {
        Self { thresholds, bands }
    }

    pub fn classify(&self, rate_bits_per_sec: f64, key: &str, link_speed_bps: u64) -> AlertLevel {
        if let Some(thresholds) = self.thresholds.get(key) {
            return thresholds.level_for(rate_bits_per_sec);
        }

        if link_speed_bps > 0 {
            return self.bands.level_for(rate_bits_per_sec, link_speed_bps);
        }

        AlertLevel::Default
    }

    /// Classify both directions of `sample`; without a rate nothing is
    /// classified
    pub fn classify_link(&self, rate: Option<&RateSample>, sample: &InterfaceSample) -> LinkAlerts {
        let Some(rate) = rate else {
            return LinkAlerts::unclassified();
        };

        LinkAlerts {
            rx: self.classify(
                rate.recv_bits_per_sec(),
                &threshold_key(&sample.name, Direction::Rx),
                sample.link_speed_bps,
            ),
            tx: self.classify(
                rate.sent_bits_per_sec(),
                &threshold_key(&sample.name, Direction::Tx),
                sample.link_speed_bps,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn classifier() -> AlertClassifier {
        let mut thresholds = ThresholdSet::new();
        thresholds.insert("eth0_rx".to_string(), Thresholds::new(1_000.0, 2_000.0, 3_000.0));
        AlertClassifier::new(thresholds, SpeedBands::default())
    }

    #[test]
    fn test_configured_thresholds() {
        let classifier = classifier();
        assert_eq!(classifier.classify(500.0, "eth0_rx", 0), AlertLevel::Ok);
        assert_eq!(classifier.classify(1_000.0, "eth0_rx", 0), AlertLevel::Careful);
        assert_eq!(classifier.classify(2_500.0, "eth0_rx", 0), AlertLevel::Warning);
        assert_eq!(classifier.classify(9_000.0, "eth0_rx", 0), AlertLevel::Critical);
    }

    #[test]
    fn test_configured_thresholds_take_precedence_over_link_speed() {
        let classifier = classifier();
        assert_eq!(classifier.classify(500.0, "eth0_rx", 600), AlertLevel::Ok);
    }

    #[test]
    fn test_link_speed_fallback() {
        let classifier = classifier();
        assert_eq!(classifier.classify(100.0, "eth0_tx", 1_000), AlertLevel::Ok);
        assert_eq!(classifier.classify(500.0, "eth0_tx", 1_000), AlertLevel::Careful);
        assert_eq!(classifier.classify(750.0, "eth0_tx", 1_000), AlertLevel::Warning);
        assert_eq!(classifier.classify(950.0, "eth0_tx", 1_000), AlertLevel::Critical);
    }

    #[test]
    fn test_custom_bands() {
        let classifier = AlertClassifier::new(ThresholdSet::new(), SpeedBands::new(10.0, 20.0, 30.0));
        assert_eq!(classifier.classify(250.0, "wlan0_rx", 1_000), AlertLevel::Warning);
    }

    #[test]
    fn test_unclassified_without_threshold_or_speed() {
        let classifier = classifier();
        assert_eq!(classifier.classify(1e9, "wlan0_rx", 0), AlertLevel::Default);
    }

    #[test]
    fn test_threshold_key_strips_virtual_label() {
        assert_eq!(threshold_key("eth0:1", Direction::Rx), "eth0_rx");
        assert_eq!(threshold_key("wlan0", Direction::Tx), "wlan0_tx");
    }

    #[test]
    fn test_classify_link() {
        let classifier = classifier();
        let sample = InterfaceSample::new("eth0:1", 0, 0, Utc::now()).with_link(true, 10_000);
        let rate = RateSample {
            recv_rate_per_sec: 250.0,  // 2000 bit/s
            sent_rate_per_sec: 1_000.0, // 8000 bit/s, 80% of link
            all_rate_per_sec: 1_250.0,
        };

        let alerts = classifier.classify_link(Some(&rate), &sample);
        assert_eq!(alerts.rx, AlertLevel::Warning);
        assert_eq!(alerts.tx, AlertLevel::Warning);

        assert_eq!(classifier.classify_link(None, &sample), LinkAlerts::unclassified());
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(AlertLevel::Ok < AlertLevel::Careful);
        assert!(AlertLevel::Careful < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Critical);
        assert_eq!(serde_json::to_string(&AlertLevel::Careful).unwrap(), "\"CAREFUL\"");
    }
}
