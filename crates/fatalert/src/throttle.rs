//! Throttle ledger
//!
//! Tracks, per error signature, when an alert was last sent, so repeated
//! occurrences of the same error inside the window stay silent. The mapping
//! is one JSON value in the store's meta table; entries are overwritten on
//! each successful send and never individually deleted. Stale signatures are
//! harmless at the volumes involved, so there is no pruning.
//!
//! `record` is called only after a confirmed successful send: a failed send
//! must not start or extend a window, otherwise a transient mail outage would
//! silently suppress the next real alert.

use std::collections::HashMap;

use anyhow::Result;
use tracing::warn;

use crate::store::ErrorStore;

/// Meta key holding the signature -> last-sent mapping
pub const THROTTLE_META_KEY: &str = "throttle.last_sent";

/// Per-signature last-notified ledger
#[derive(Debug, Default)]
pub struct ThrottleLedger {
    last_sent: HashMap<String, i64>,
}

impl ThrottleLedger {
    /// Empty ledger (no signature has ever been notified)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted ledger from the store's meta table.
    /// A missing or corrupt value loads as an empty ledger.
    pub fn load(store: &ErrorStore) -> Self {
        let last_sent = match store.get_meta(THROTTLE_META_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("throttle ledger unreadable, starting fresh: {}", e);
                HashMap::new()
            }),
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!("throttle ledger unavailable, starting fresh: {}", e);
                HashMap::new()
            }
        };
        Self { last_sent }
    }

    /// Decide whether a notification for `signature` may go out at `now`
    /// (unix seconds). True when throttling is disabled (window 0), no prior
    /// entry exists, or the window has fully elapsed (boundary inclusive).
    /// Pure decision over current state; no side effect.
    pub fn should_notify(&self, signature: &str, now: i64, window_minutes: u64) -> bool {
        if window_minutes == 0 {
            return true;
        }
        match self.last_sent.get(signature) {
            None => true,
            Some(&last) => now - last >= window_minutes as i64 * 60,
        }
    }

    /// Unconditionally overwrite the last-sent timestamp for `signature` and
    /// persist the mapping. Last-write-wins across concurrent processes is
    /// accepted: a lost race costs at most one extra alert inside the window.
    pub fn record(&mut self, store: &ErrorStore, signature: &str, now: i64) -> Result<()> {
        self.last_sent.insert(signature.to_string(), now);
        let json = serde_json::to_string(&self.last_sent)?;
        store.set_meta(THROTTLE_META_KEY, &json)?;
        Ok(())
    }

    /// When `signature` was last notified, if ever
    pub fn last_notified(&self, signature: &str) -> Option<i64> {
        self.last_sent.get(signature).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn test_store() -> (NamedTempFile, ErrorStore) {
        let tmp = NamedTempFile::new().unwrap();
        let store = ErrorStore::open_at(tmp.path()).unwrap();
        (tmp, store)
    }

    #[test]
    fn test_zero_window_always_notifies() {
        let (_tmp, store) = test_store();
        let mut ledger = ThrottleLedger::new();
        ledger.record(&store, "sig", 1_700_000_000).unwrap();

        assert!(ledger.should_notify("sig", 1_700_000_000, 0));
        assert!(ledger.should_notify("sig", 1_700_000_001, 0));
    }

    #[test]
    fn test_fresh_signature_notifies() {
        let ledger = ThrottleLedger::new();
        assert!(ledger.should_notify("never-seen", 1_700_000_000, 30));
    }

    #[test]
    fn test_window_boundary_inclusive() {
        let (_tmp, store) = test_store();
        let mut ledger = ThrottleLedger::new();
        let t0 = 1_700_000_000;
        let window = 30u64;
        ledger.record(&store, "sig", t0).unwrap();

        // One second short of the window: suppressed
        assert!(!ledger.should_notify("sig", t0 + window as i64 * 60 - 1, window));
        // Exactly at the window edge: allowed
        assert!(ledger.should_notify("sig", t0 + window as i64 * 60, window));
    }

    #[test]
    fn test_record_overwrites() {
        let (_tmp, store) = test_store();
        let mut ledger = ThrottleLedger::new();
        ledger.record(&store, "sig", 100).unwrap();
        ledger.record(&store, "sig", 200).unwrap();
        assert_eq!(ledger.last_notified("sig"), Some(200));
    }

    #[test]
    fn test_persists_across_loads() {
        let (_tmp, store) = test_store();
        let mut ledger = ThrottleLedger::new();
        ledger.record(&store, "sig", 1_700_000_000).unwrap();

        let reloaded = ThrottleLedger::load(&store);
        assert_eq!(reloaded.last_notified("sig"), Some(1_700_000_000));
        assert!(!reloaded.should_notify("sig", 1_700_000_060, 30));
    }

    #[test]
    fn test_corrupt_ledger_loads_empty() {
        let (_tmp, store) = test_store();
        store.set_meta(THROTTLE_META_KEY, "not json").unwrap();

        let ledger = ThrottleLedger::load(&store);
        assert!(ledger.should_notify("anything", 0, 30));
    }

    #[test]
    fn test_signatures_independent() {
        let (_tmp, store) = test_store();
        let mut ledger = ThrottleLedger::new();
        ledger.record(&store, "a", 1_700_000_000).unwrap();

        assert!(!ledger.should_notify("a", 1_700_000_060, 30));
        assert!(ledger.should_notify("b", 1_700_000_060, 30));
    }
}
