use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Predicate deciding whether a string satisfies a named format
pub type FormatPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Named string-format predicates
///
/// Use [`FormatRegistry::global`] for the shared instance, or
/// [`FormatRegistry::new`] for an isolated one (tests, embedded apps).
#[derive(Default)]
pub struct FormatRegistry {
    formats: RwLock<HashMap<String, FormatPredicate>>,
}

static GLOBAL_FORMATS: OnceLock<Arc<FormatRegistry>> = OnceLock::new();

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> Arc<FormatRegistry> {
        GLOBAL_FORMATS
            .get_or_init(|| Arc::new(FormatRegistry::new()))
            .clone()
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<FormatPredicate> {
        self.formats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Register `predicate` under `name` unless a predicate already exists
    ///
    /// Returns `true` when this call inserted it. The lookup and the insert
    /// happen under the same write lock.
    pub fn set_if_absent(&self, name: impl Into<String>, predicate: FormatPredicate) -> bool {
        let mut formats = self.formats.write().unwrap_or_else(PoisonError::into_inner);
        let name = name.into();
        if formats.contains_key(&name) {
            return false;
        }
        formats.insert(name, predicate);
        true
    }

    /// Run the predicate for `name`; `None` when the format is unknown
    pub fn check(&self, name: &str, value: &str) -> Option<bool> {
        // Clone out so the predicate runs without holding the lock.
        let predicate = self.get(name)?;
        Some(predicate(value))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .formats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.formats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}
