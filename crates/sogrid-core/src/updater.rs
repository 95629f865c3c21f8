//! Functional state updates.

use std::fmt;

/// A state update: either a literal replacement value or a pure function
/// from the old value to the new one.
///
/// Every state setter in the grid accepts an `Updater`, so callers can write
/// `store.set_global_filter("abc")` or
/// `store.set_sorting(Updater::with(|old| ...))` interchangeably.
pub enum Updater<T> {
    /// Replace the current value.
    Value(T),
    /// Derive the new value from the current one.
    Func(Box<dyn FnOnce(&T) -> T + Send>),
}

impl<T> Updater<T> {
    /// Creates a functional updater.
    pub fn with<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        Updater::Func(Box::new(f))
    }

    /// Resolves the update against the current value.
    pub fn apply(self, old: &T) -> T {
        match self {
            Updater::Value(value) => value,
            Updater::Func(f) => f(old),
        }
    }

    /// Returns `true` if this is a literal replacement.
    pub fn is_value(&self) -> bool {
        matches!(self, Updater::Value(_))
    }
}

impl<T> From<T> for Updater<T> {
    fn from(value: T) -> Self {
        Updater::Value(value)
    }
}

impl From<&str> for Updater<String> {
    fn from(value: &str) -> Self {
        Updater::Value(value.to_string())
    }
}

impl<T: fmt::Debug> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Updater::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Updater::Func(_) => f.write_str("Func(..)"),
        }
    }
}
