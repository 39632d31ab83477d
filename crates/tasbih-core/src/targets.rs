//! Per-phrase target counts.
//!
//! A phrase's target is its catalog default unless the user has set an
//! override. Overrides are validated when they enter the registry, so the
//! map only ever holds values in `1..=MAX_TARGET`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::PhraseCatalog;
use crate::error::ValidationError;

/// Largest target a user may set.
pub const MAX_TARGET: u32 = 99_999;

/// Validate a raw target value.
pub fn validate_target(value: i64) -> Result<u32, ValidationError> {
    if value < 1 || value > i64::from(MAX_TARGET) {
        return Err(ValidationError::TargetOutOfRange {
            value,
            max: MAX_TARGET,
        });
    }
    Ok(value as u32)
}

/// Parse and validate user-typed target input.
pub fn parse_target(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;
    validate_target(value)
}

/// Serialized form of the override map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetOverrides(pub BTreeMap<String, u32>);

/// Target lookup with user overrides.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    catalog: Arc<PhraseCatalog>,
    overrides: BTreeMap<String, u32>,
}

impl TargetRegistry {
    pub fn new(catalog: Arc<PhraseCatalog>) -> Self {
        Self {
            catalog,
            overrides: BTreeMap::new(),
        }
    }

    /// Effective target for `phrase_id`. Unknown phrases fall back to the first phrase's default.
    pub fn get(&self, phrase_id: &str) -> u32 {
        if let Some(&target) = self.overrides.get(phrase_id) {
            return target;
        }
        self.catalog
            .get(phrase_id)
            .unwrap_or_else(|| self.catalog.first())
            .default_target
    }

    pub fn set(&mut self, phrase_id: &str, target: i64) -> Result<u32, ValidationError> {
        if !self.catalog.contains(phrase_id) {
            return Err(ValidationError::UnknownPhrase(phrase_id.to_string()));
        }
        let target = validate_target(target)?;
        self.overrides.insert(phrase_id.to_string(), target);
        Ok(target)
    }

    /// Drop the override; returns the default now in effect.
    pub fn clear(&mut self, phrase_id: &str) -> u32 {
        self.overrides.remove(phrase_id);
        self.get(phrase_id)
    }

    pub fn is_overridden(&self, phrase_id: &str) -> bool {
        self.overrides.contains_key(phrase_id)
    }

    pub fn overrides(&self) -> TargetOverrides {
        TargetOverrides(self.overrides.clone())
    }

    pub fn serialize(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.overrides())
    }

    /// Replace overrides from their JSON form. Invalid entries are dropped.
    pub fn deserialize(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        let raw: BTreeMap<String, i64> = serde_json::from_str(json)?;
        self.overrides.clear();
        for (phrase_id, value) in raw {
            if !self.catalog.contains(&phrase_id) {
                tracing::warn!(%phrase_id, "dropping target override for unknown phrase");
                continue;
            }
            match validate_target(value) {
                Ok(target) => {
                    self.overrides.insert(phrase_id, target);
                }
                Err(e) => tracing::warn!(%phrase_id, error = %e, "dropping invalid target override"),
            }
        }
        Ok(self.overrides.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TargetRegistry {
        TargetRegistry::new(Arc::new(PhraseCatalog::builtin()))
    }

    #[test]
    fn boundary_values() {
        assert!(validate_target(0).is_err());
        assert!(validate_target(-1).is_err());
        assert!(validate_target(100_000).is_err());
        assert_eq!(validate_target(1).unwrap(), 1);
        assert_eq!(validate_target(99_999).unwrap(), 99_999);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert_eq!(
            parse_target("abc").unwrap_err(),
            ValidationError::NotANumber("abc".into())
        );
        assert_eq!(parse_target(" 12 ").unwrap(), 12);
        assert!(parse_target("2.5").is_err());
    }

    #[test]
    fn override_then_clear() {
        let mut reg = registry();
        assert_eq!(reg.get("subhanallah"), 33);
        reg.set("subhanallah", 99).unwrap();
        assert_eq!(reg.get("subhanallah"), 99);
        assert!(reg.is_overridden("subhanallah"));
        assert_eq!(reg.clear("subhanallah"), 33);
        assert!(!reg.is_overridden("subhanallah"));
    }

    #[test]
    fn rejected_override_is_not_stored() {
        let mut reg = registry();
        assert!(reg.set("subhanallah", 100_000).is_err());
        assert!(reg.set("nope", 5).is_err());
        assert!(reg.overrides().0.is_empty());
    }

    #[test]
    fn deserialize_drops_bad_entries() {
        let mut reg = registry();
        let kept = reg
            .deserialize(r#"{"subhanallah": 11, "alhamdulillah": 0, "ghost": 5, "salawat": 200000}"#)
            .unwrap();
        assert_eq!(kept, 1);
        assert_eq!(reg.get("subhanallah"), 11);
        assert_eq!(reg.get("alhamdulillah"), 33);

        let json = reg.serialize().unwrap();
        let mut other = registry();
        other.deserialize(&json).unwrap();
        assert_eq!(other.overrides(), reg.overrides());
    }
}
