use dermis_foundation::validation::ValidationRules;
use dermis_kernel::security::ValidationResult;
use parking_lot::Mutex;
use std::sync::Arc;

/// A custom rule that records every value it is called with.
///
/// The rule passes unless a value is listed with [`reject`](Self::reject).
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    seen: Arc<Mutex<Vec<String>>>,
    rejected: Arc<Mutex<Vec<String>>>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the rule fail for `value` with `"<value> is not allowed"`.
    pub fn reject(&self, value: &str) -> &Self {
        self.rejected.lock().push(value.to_string());
        self
    }

    /// Attach this counter as the custom rule of `rules`.
    pub fn attach(&self, rules: ValidationRules) -> ValidationRules {
        let seen = Arc::clone(&self.seen);
        let rejected = Arc::clone(&self.rejected);
        rules.custom(move |value| {
            seen.lock().push(value.to_string());
            if rejected.lock().iter().any(|r| r == value) {
                ValidationResult::invalid(format!("{value} is not allowed"))
            } else {
                ValidationResult::ok()
            }
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}
