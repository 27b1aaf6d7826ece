use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::NetworkRules;
use crate::domain::{
    build_snapshot, AlertClassifier, DisplayRecord, InterfaceSample, RateTracker, VendorTable, UNKNOWN_VENDOR,
};
use crate::ports::{CounterSource, RawInterface, RecordStore, Tick};

/// State carried from one tick to the next
#[derive(Debug, Default)]
struct PollState {
    rates: RateTracker,
    /// Interfaces whose rates have departed from zero at least once
    ever_nonzero: HashSet<String>,
    last_records: Vec<DisplayRecord>,
}

/// Network polling service: turns counter source output into display records
pub struct NetworkMonitor {
    counter_source: Arc<dyn CounterSource>,
    vendors: Arc<VendorTable>,
    rules: NetworkRules,
    classifier: AlertClassifier,
    state: Mutex<PollState>,
}

impl NetworkMonitor {
    pub fn new(counter_source: Arc<dyn CounterSource>, vendors: Arc<VendorTable>, rules: NetworkRules) -> Self {
        let classifier = rules.classifier();
        Self {
            counter_source,
            vendors,
            rules,
            classifier,
            state: Mutex::new(PollState::default()),
        }
    }

    pub fn vendors(&self) -> &VendorTable {
        &self.vendors
    }

    /// Run one polling cycle
    pub async fn poll_once(&self) -> Tick {
        self.poll_at(Utc::now()).await
    }

    /// Run one polling cycle with `now` as the acquisition instant
    pub async fn poll_at(&self, now: DateTime<Utc>) -> Tick {
        let interfaces = match self.counter_source.fetch_counters().await {
            Ok(interfaces) => interfaces,
            Err(e) => {
                warn!(error = %e, "Cannot retrieve network stats, keeping previous records");
                return Tick {
                    timestamp: now,
                    stale: true,
                    interfaces: self.lock_state().last_records.clone(),
                };
            }
        };

        let mut state = self.lock_state();

        let seen: HashSet<String> = interfaces.iter().map(|i| i.name.clone()).collect();
        state.rates.retain(&seen);
        state.ever_nonzero.retain(|name| seen.contains(name));

        let mut records = Vec::with_capacity(interfaces.len());
        for interface in &interfaces {
            if self.rules.is_hidden(&interface.name) {
                continue;
            }

            let sample = self.sample_of(interface, now);
            let rate = state.rates.update(&sample.name, sample.clone(), now);
            if rate.is_some_and(|r| r.is_nonzero()) {
                state.ever_nonzero.insert(sample.name.clone());
            }

            let alerts = self.classifier.classify_link(rate.as_ref(), &sample);
            let ever_nonzero = state.ever_nonzero.contains(&sample.name);
            if let Some(record) = build_snapshot(&sample, rate.as_ref(), alerts, ever_nonzero) {
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.interface_name.cmp(&b.interface_name));

        debug!(
            interfaces = interfaces.len(),
            records = records.len(),
            "Network poll complete"
        );
        state.last_records = records.clone();

        Tick {
            timestamp: now,
            stale: false,
            interfaces: records,
        }
    }

    fn sample_of(&self, interface: &RawInterface, now: DateTime<Utc>) -> InterfaceSample {
        let mac_address = interface.mac_address.clone();
        let vendor = match &mac_address {
            Some(mac) => self.vendors.resolve(mac),
            None => UNKNOWN_VENDOR,
        };

        InterfaceSample::new(&interface.name, interface.bytes_sent, interface.bytes_recv, now)
            .with_alias(self.rules.alias_for(&interface.name))
            .with_link(interface.is_up, interface.speed_bps)
            .with_vendor(vendor)
            .with_mac_address(mac_address)
    }

    fn lock_state(&self) -> MutexGuard<'_, PollState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spawn the polling loop; it publishes every tick to `store` until
/// `shutdown_rx` fires
pub fn spawn_poller(
    monitor: Arc<NetworkMonitor>,
    store: Arc<dyn RecordStore>,
    period: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let tick = monitor.poll_once().await;
                    store.publish(tick);
                }
                _ = &mut shutdown_rx => break,
            }
        }
        info!("Network poller stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::AlertLevel;
    use crate::ports::SourceError;

    /// Counter source replaying scripted ticks
    struct ScriptedSource {
        ticks: Mutex<VecDeque<Result<Vec<RawInterface>, SourceError>>>,
    }

    impl ScriptedSource {
        fn new(ticks: Vec<Result<Vec<RawInterface>, SourceError>>) -> Arc<Self> {
            Arc::new(Self {
                ticks: Mutex::new(ticks.into()),
            })
        }
    }

    #[async_trait]
    impl CounterSource for ScriptedSource {
        async fn fetch_counters(&self) -> Result<Vec<RawInterface>, SourceError> {
            self.ticks
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn raw(name: &str, sent: u64, recv: u64, speed_bps: u64) -> RawInterface {
        RawInterface {
            name: name.to_string(),
            bytes_sent: sent,
            bytes_recv: recv,
            is_up: true,
            speed_bps,
            mac_address: Some("e0:43:db:12:34:56".to_string()),
        }
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn vendors() -> Arc<VendorTable> {
        Arc::new(VendorTable::load("E043DB\tShenzhen ViewAt Technology Co.,Ltd.\n".as_bytes()))
    }

    #[tokio::test]
    async fn test_rates_vendor_and_alerts() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("eth0", 0, 1000, 80_000)]),
            Ok(vec![raw("eth0", 500, 2000, 80_000)]),
        ]);
        let monitor = NetworkMonitor::new(source, vendors(), NetworkRules::default());

        let first = monitor.poll_at(t(0)).await;
        assert!(first.interfaces.is_empty());
        assert!(!first.stale);

        let second = monitor.poll_at(t(1)).await;
        assert_eq!(second.interfaces.len(), 1);
        let eth0 = &second.interfaces[0];
        assert_eq!(eth0.bytes_recv_rate_per_sec, 1000.0);
        assert_eq!(eth0.bytes_sent_rate_per_sec, 500.0);
        assert_eq!(eth0.bytes_all_rate_per_sec, 1500.0);
        assert_eq!(eth0.vendor, "Shenzhen ViewAt Technology Co.,Ltd.");
        // 8000 bit/s of 80000 is 10%, 4000 bit/s is 5%
        assert_eq!(eth0.rx_alert, AlertLevel::Ok);
        assert_eq!(eth0.tx_alert, AlertLevel::Ok);
    }

    #[tokio::test]
    async fn test_source_failure_reemits_previous_records() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("eth0", 0, 0, 0)]),
            Ok(vec![raw("eth0", 100, 100, 0)]),
            Err(SourceError::Unavailable("netlink down".to_string())),
        ]);
        let monitor = NetworkMonitor::new(source, vendors(), NetworkRules::default());

        monitor.poll_at(t(0)).await;
        let good = monitor.poll_at(t(1)).await;
        let failed = monitor.poll_at(t(2)).await;

        assert!(failed.stale);
        assert_eq!(failed.interfaces, good.interfaces);
        assert_eq!(failed.interfaces[0].rx_alert, AlertLevel::Default);
    }

    #[tokio::test]
    async fn test_idle_interface_is_hidden_until_traffic() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("eth0", 0, 0, 0)]),
            Ok(vec![raw("eth0", 0, 0, 0)]),
            Ok(vec![raw("eth0", 0, 10, 0)]),
            Ok(vec![raw("eth0", 0, 10, 0)]),
        ]);
        let monitor = NetworkMonitor::new(source, vendors(), NetworkRules::default());

        monitor.poll_at(t(0)).await;
        assert!(monitor.poll_at(t(1)).await.interfaces.is_empty());
        assert_eq!(monitor.poll_at(t(2)).await.interfaces.len(), 1);
        // Idle again, but it has carried traffic before
        let idle = monitor.poll_at(t(3)).await;
        assert_eq!(idle.interfaces.len(), 1);
        assert_eq!(idle.interfaces[0].bytes_recv_rate_per_sec, 0.0);
    }

    #[tokio::test]
    async fn test_hidden_aliased_and_down_interfaces() {
        let mut down = raw("eth1", 0, 0, 0);
        down.is_up = false;
        let mut down_later = raw("eth1", 10, 10, 0);
        down_later.is_up = false;

        let source = ScriptedSource::new(vec![
            Ok(vec![raw("lo", 0, 0, 0), raw("wlan0", 0, 0, 0), down]),
            Ok(vec![raw("lo", 5, 5, 0), raw("wlan0", 5, 5, 0), down_later]),
        ]);
        let rules = NetworkRules::load_from_str("hide = [\"lo\"]\n[aliases]\nwlan0 = \"WiFi\"\n").unwrap();
        let monitor = NetworkMonitor::new(source, vendors(), rules);

        monitor.poll_at(t(0)).await;
        let tick = monitor.poll_at(t(1)).await;

        assert_eq!(tick.interfaces.len(), 1);
        assert_eq!(tick.interfaces[0].interface_name, "wlan0");
        assert_eq!(tick.interfaces[0].display_name, "WiFi");
    }

    #[tokio::test]
    async fn test_disappearing_interface_starts_over() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("veth0", 0, 0, 0)]),
            Ok(vec![]),
            Ok(vec![raw("veth0", 0, 5000, 0)]),
        ]);
        let monitor = NetworkMonitor::new(source, vendors(), NetworkRules::default());

        monitor.poll_at(t(0)).await;
        monitor.poll_at(t(1)).await;
        // Baseline was evicted, so no rate on return
        assert!(monitor.poll_at(t(2)).await.interfaces.is_empty());
    }

    #[tokio::test]
    async fn test_counter_reset_suppresses_one_tick() {
        let source = ScriptedSource::new(vec![
            Ok(vec![raw("eth0", 0, 1000, 0)]),
            Ok(vec![raw("eth0", 0, 2000, 0)]),
            Ok(vec![raw("eth0", 0, 100, 0)]),
            Ok(vec![raw("eth0", 0, 400, 0)]),
        ]);
        let monitor = NetworkMonitor::new(source, vendors(), NetworkRules::default());

        monitor.poll_at(t(0)).await;
        monitor.poll_at(t(1)).await;
        assert!(monitor.poll_at(t(2)).await.interfaces.is_empty());

        let tick = monitor.poll_at(t(3)).await;
        assert_eq!(tick.interfaces[0].bytes_recv_rate_per_sec, 300.0);
    }

    #[tokio::test]
    async fn test_poller_publishes_until_shutdown() {
        let source = ScriptedSource::new(vec![Ok(vec![raw("eth0", 0, 0, 0)])]);
        let monitor = Arc::new(NetworkMonitor::new(source, vendors(), NetworkRules::default()));
        let store = Arc::new(MemoryStore::new());
        let before = store.latest().timestamp;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = spawn_poller(monitor, store.clone(), Duration::from_millis(10), shutdown_rx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();

        assert!(store.latest().timestamp > before);
    }
}
