//! Background Expiry Sweeper
//!
//! A background task that periodically reclaims expired entries. This is
//! "active expiry", complementing the lazy expiry done when an expired key
//! is read.
//!
//! ## Why Do We Need This?
//!
//! Lazy expiry only fires on access: a key that expires and is never read
//! again would stay in memory indefinitely. The sweeper walks the deadline
//! index once a second and deletes whatever is due.

use crate::storage::Keyspace;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// How often the sweeper wakes up.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task stops.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task waking every
    /// `interval`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use emberkv::storage::{Keyspace, ExpirySweeper, SWEEP_INTERVAL};
    /// use std::collections::HashMap;
    /// use std::sync::Arc;
    ///
    /// let keyspace = Arc::new(Keyspace::new(HashMap::new()));
    /// let sweeper = ExpirySweeper::start(keyspace, SWEEP_INTERVAL);
    ///
    /// // Sweeper runs in the background; dropping the handle stops it.
    /// drop(sweeper);
    /// ```
    pub fn start(keyspace: Arc<Keyspace>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(sweeper_loop(keyspace, interval, shutdown_rx));

        info!("Background expiry sweeper started");

        Self { shutdown_tx }
    }

    /// Stops the expiry sweeper.
    ///
    /// This is called automatically when the handle is dropped.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
        info!("Background expiry sweeper stopped");
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop(
    keyspace: Arc<Keyspace>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        let expired = keyspace.sweep();

        if expired > 0 {
            debug!(
                expired = expired,
                keys_remaining = keyspace.len(),
                "Expired keys reclaimed"
            );
        }
    }
}

/// Starts the expiry sweeper with the default one-second interval.
///
/// This is a convenience function for the common case.
pub fn start_expiry_sweeper(keyspace: Arc<Keyspace>) -> ExpirySweeper {
    ExpirySweeper::start(keyspace, SWEEP_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Value;
    use crate::storage::keyspace::now_ms;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_sweeper_reclaims_expired_keys() {
        let keyspace = Arc::new(Keyspace::new(HashMap::new()));

        for i in 0..10 {
            keyspace.set(
                format!("key{}", i),
                Value::bulk("value"),
                Some(now_ms() + 50),
            );
        }
        keyspace.set("persistent".to_string(), Value::bulk("value"), None);

        assert_eq!(keyspace.len(), 11);

        let _sweeper = ExpirySweeper::start(Arc::clone(&keyspace), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(200)).await;

        // Only the persistent key remains
        assert_eq!(keyspace.len(), 1);
        assert_eq!(keyspace.get("persistent"), Some(Value::bulk("value")));
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_drop() {
        let keyspace = Arc::new(Keyspace::new(HashMap::new()));

        {
            let _sweeper =
                ExpirySweeper::start(Arc::clone(&keyspace), Duration::from_millis(10));
            tokio::time::sleep(Duration::from_millis(50)).await;
            // Sweeper is dropped here
        }

        keyspace.set("key".to_string(), Value::bulk("value"), Some(now_ms() + 10));

        tokio::time::sleep(Duration::from_millis(100)).await;

        // The stopped sweeper did not reclaim it; the entry is still in the
        // store until a lazy-expiring read removes it.
        assert_eq!(keyspace.len(), 1);
        assert_eq!(keyspace.get("key"), None);
        assert_eq!(keyspace.len(), 0);
    }
}
