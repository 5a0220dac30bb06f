use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::store::Store;

/// How often the janitor sweeps the store by default.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(3);

/// Background task that periodically removes expired keys, so that keys which are never read
/// again do not stay in memory past their TTL plus one interval.
pub struct Janitor {
    store: Store,
    interval: Duration,
}

impl Janitor {
    /// A zero `interval` cannot drive a ticker and falls back to [`SWEEP_INTERVAL`].
    pub fn new(store: Store, interval: Duration) -> Janitor {
        let interval = if interval.is_zero() {
            warn!("Zero sweep interval requested, using {:?}", SWEEP_INTERVAL);
            SWEEP_INTERVAL
        } else {
            interval
        };

        Janitor { store, interval }
    }

    /// Sweeps once per tick, forever. Stop it by aborting the task running it.
    pub async fn run(self) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval = ?self.interval, "Janitor started");

        loop {
            ticker.tick().await;
            let removed = self.store.sweep();
            if removed > 0 {
                debug!(removed, "Removed expired keys");
            }
        }
    }

    pub fn spawn(store: Store, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(Self::new(store, interval).run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_TTL;

    #[tokio::test]
    async fn removes_unread_keys() {
        time::pause();

        let store = Store::new();
        let janitor = Janitor::spawn(store.clone(), SWEEP_INTERVAL);

        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());
        store.expire("key2", 20).unwrap();
        assert_eq!(store.len(), 2);

        time::advance(DEFAULT_TTL + SWEEP_INTERVAL).await;
        time::sleep(Duration::from_millis(1)).await;

        assert_eq!(store.len(), 1);
        assert!(store.exists("key2"));

        time::advance(Duration::from_secs(20)).await;
        time::sleep(Duration::from_millis(1)).await;
        assert!(store.is_empty());

        janitor.abort();
    }

    #[tokio::test]
    async fn zero_interval_falls_back_to_default() {
        time::pause();

        let store = Store::new();
        let janitor = Janitor::spawn(store.clone(), Duration::ZERO);

        store.set("key1".to_string(), "value1".to_string());

        time::advance(DEFAULT_TTL + SWEEP_INTERVAL).await;
        time::sleep(Duration::from_millis(1)).await;

        assert!(!janitor.is_finished());
        assert!(store.is_empty());

        janitor.abort();
    }

    #[tokio::test]
    async fn leaves_live_keys_alone() {
        time::pause();

        let store = Store::with_default_ttl(None);
        let janitor = Janitor::spawn(store.clone(), SWEEP_INTERVAL);

        store.set("key1".to_string(), "value1".to_string());

        time::advance(SWEEP_INTERVAL * 10).await;
        time::sleep(Duration::from_millis(1)).await;

        assert_eq!(store.len(), 1);

        janitor.abort();
    }
}
