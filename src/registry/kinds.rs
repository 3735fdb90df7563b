use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::schema::Value;

/// Validator for a custom scalar kind: `(schema options, value) -> valid`
pub type KindValidator = Arc<dyn Fn(&serde_json::Value, &Value) -> bool + Send + Sync>;

/// Custom scalar kinds such as `File` and `Files`
#[derive(Default)]
pub struct TypeRegistry {
    kinds: RwLock<HashMap<String, KindValidator>>,
}

static GLOBAL_KINDS: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> Arc<TypeRegistry> {
        GLOBAL_KINDS
            .get_or_init(|| Arc::new(TypeRegistry::new()))
            .clone()
    }

    pub fn has(&self, kind: &str) -> bool {
        self.kinds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(kind)
    }

    pub fn get(&self, kind: &str) -> Option<KindValidator> {
        self.kinds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .cloned()
    }

    /// Return the validator registered under `kind`, registering the one
    /// produced by `make` if there is none yet
    pub fn get_or_register<F>(&self, kind: &str, make: F) -> KindValidator
    where
        F: FnOnce() -> KindValidator,
    {
        let mut kinds = self.kinds.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = kinds.get(kind) {
            return existing.clone();
        }
        let validator = make();
        kinds.insert(kind.to_string(), validator.clone());
        tracing::debug!(kind, "Registered custom schema kind");
        validator
    }

    /// Run the validator for `kind`; `None` when the kind is unknown
    pub fn check(&self, kind: &str, options: &serde_json::Value, value: &Value) -> Option<bool> {
        let validator = self.get(kind)?;
        Some(validator(options, value))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds = self.kinds.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&String> = kinds.keys().collect();
        names.sort();
        f.debug_struct("TypeRegistry").field("kinds", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_register_reuses_existing() {
        let registry = TypeRegistry::new();
        let first = registry.get_or_register("Even", || {
            Arc::new(|_: &serde_json::Value, v: &Value| v.as_f64().is_some_and(|n| n % 2.0 == 0.0))
        });
        let second = registry.get_or_register("Even", || Arc::new(|_: &serde_json::Value, _: &Value| true));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.check("Even", &serde_json::Value::Null, &Value::from(3)), Some(false));
    }

    #[test]
    fn test_unknown_kind() {
        let registry = TypeRegistry::new();
        assert!(!registry.has("Nope"));
        assert_eq!(registry.check("Nope", &serde_json::Value::Null, &Value::Null), None);
    }
}
