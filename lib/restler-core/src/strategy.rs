//! Execution strategy selection by declared return type.

use derive_more::Display;

/// How a remote method call is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum ExecutionStrategy {
    /// Execute on the caller's task and return the value.
    #[default]
    #[display("direct")]
    Direct,
    /// Spawn on the worker pool and return a [`crate::DeferredResult`] at once.
    #[display("deferred")]
    Deferred,
    /// Return a [`crate::Callable`]; nothing runs until it is called.
    #[display("lazy")]
    Lazy,
}

const BUILTIN: &[(&str, ExecutionStrategy)] = &[
    ("DeferredResult", ExecutionStrategy::Deferred),
    ("Callable", ExecutionStrategy::Lazy),
];

/// Select the strategy for a return type constructor name.
///
/// Unregistered names fall back to [`ExecutionStrategy::Direct`].
///
/// # Example
///
/// ```
/// use restler_core::{ExecutionStrategy, select_strategy};
///
/// assert_eq!(select_strategy("DeferredResult"), ExecutionStrategy::Deferred);
/// assert_eq!(select_strategy("Callable"), ExecutionStrategy::Lazy);
/// assert_eq!(select_strategy("User"), ExecutionStrategy::Direct);
/// ```
#[must_use]
pub fn select_strategy(return_type: &str) -> ExecutionStrategy {
    lookup(BUILTIN, return_type)
}

fn lookup(entries: &[(&str, ExecutionStrategy)], return_type: &str) -> ExecutionStrategy {
    entries
        .iter()
        .find(|(name, _)| *name == return_type)
        .map_or(ExecutionStrategy::Direct, |(_, strategy)| *strategy)
}

/// Mapping from return type constructor name to execution strategy.
///
/// `#[restler]` always resolves with the built-in entries through
/// [`select_strategy`]. A table is for code that describes methods by hand,
/// such as a custom [`crate::MethodDescription`] set with extra wrapper
/// types. It is read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTable {
    entries: Vec<(&'static str, ExecutionStrategy)>,
}

impl StrategyTable {
    /// The built-in table: `DeferredResult` is deferred, `Callable` is lazy.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.to_vec(),
        }
    }

    /// Add or replace an entry, returning the extended table.
    #[must_use]
    pub fn with(mut self, return_type: &'static str, strategy: ExecutionStrategy) -> Self {
        match self.entries.iter_mut().find(|(name, _)| *name == return_type) {
            Some(entry) => entry.1 = strategy,
            None => self.entries.push((return_type, strategy)),
        }
        self
    }

    /// Strategy for `return_type`, [`ExecutionStrategy::Direct`] if unregistered.
    #[must_use]
    pub fn select(&self, return_type: &str) -> ExecutionStrategy {
        lookup(&self.entries, return_type)
    }

    /// Registered entries.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, ExecutionStrategy)> + '_ {
        self.entries.iter().copied()
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_strategies() {
        let table = StrategyTable::builtin();
        assert_eq!(table.select("DeferredResult"), ExecutionStrategy::Deferred);
        assert_eq!(table.select("Callable"), ExecutionStrategy::Lazy);
        assert_eq!(table.entries().count(), 2);
    }

    #[test]
    fn free_function_agrees_with_builtin_table() {
        let table = StrategyTable::default();
        for name in ["DeferredResult", "Callable", "Result", "User"] {
            assert_eq!(select_strategy(name), table.select(name), "{name}");
        }
    }

    #[test]
    fn unregistered_types_are_direct() {
        for name in ["User", "Vec", "Option", "()", "", "deferredresult"] {
            assert_eq!(select_strategy(name), ExecutionStrategy::Direct, "{name}");
        }
    }

    #[test]
    fn with_adds_and_replaces() {
        let table = StrategyTable::builtin()
            .with("Future", ExecutionStrategy::Deferred)
            .with("Callable", ExecutionStrategy::Direct);

        assert_eq!(table.select("Future"), ExecutionStrategy::Deferred);
        assert_eq!(table.select("Callable"), ExecutionStrategy::Direct);
        assert_eq!(table.entries().count(), 3);
    }

    #[test]
    fn strategy_display() {
        assert_eq!(ExecutionStrategy::Direct.to_string(), "direct");
        assert_eq!(ExecutionStrategy::Deferred.to_string(), "deferred");
        assert_eq!(ExecutionStrategy::Lazy.to_string(), "lazy");
        assert_eq!(ExecutionStrategy::default(), ExecutionStrategy::Direct);
    }
}
