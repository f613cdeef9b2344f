//! Key exclusion.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

type ExcludeFn = dyn Fn(&str) -> bool + Send + Sync;

/// Predicate selecting keys that bypass the limiter entirely.
///
/// An excluded key is never passed to the limiter, so it is neither
/// penalized nor counted.
#[derive(Clone)]
pub struct ExcludedKey(Arc<ExcludeFn>);

impl ExcludedKey {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Set-membership predicate over a fixed list. Duplicates collapse.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = keys.into_iter().map(Into::into).collect();
        Self::new(move |key| set.contains(key))
    }

    pub fn matches(&self, key: &str) -> bool {
        (self.0)(key)
    }
}

impl fmt::Debug for ExcludedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExcludedKey(..)")
    }
}
