use dermis_kernel::security::{StoreError, StoreResult, TokenStore};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// An in-memory token store that can be switched into a failing state.
///
/// While failing, every operation returns `StoreError::Unavailable` and
/// leaves the stored values untouched, so a test can check that a manager
/// recovers once storage comes back.
#[derive(Debug, Default)]
pub struct FlakyTokenStore {
    values: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
    failures: AtomicUsize,
}

impl FlakyTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out failing.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// How many operations were refused so far.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// Read the raw slot, bypassing the failure switch.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("flaky store is failing".into()));
        }
        Ok(())
    }
}

impl TokenStore for FlakyTokenStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check()?;
        Ok(self.peek(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check()?;
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.check()?;
        self.values.lock().remove(key);
        Ok(())
    }
}
