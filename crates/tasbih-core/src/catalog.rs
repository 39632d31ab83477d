//! Phrase catalog.
//!
//! The catalog is the fixed, ordered list of phrases a session cycles
//! through. Order matters: reaching a phrase's target advances to the next
//! entry, wrapping from the last back to the first.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ValidationError;

/// One ritual phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseDefinition {
    /// Stable key used in storage and on the command line.
    pub id: String,
    pub display_text: String,
    pub native_script_text: String,
    /// Always positive.
    pub default_target: u32,
    pub audio_cue_id: String,
}

impl PhraseDefinition {
    pub fn new(
        id: impl Into<String>,
        display_text: impl Into<String>,
        native_script_text: impl Into<String>,
        default_target: u32,
    ) -> Self {
        let id = id.into();
        Self {
            audio_cue_id: id.clone(),
            id,
            display_text: display_text.into(),
            native_script_text: native_script_text.into(),
            default_target,
        }
    }
}

/// Non-empty ordered sequence of phrases with unique ids.
#[derive(Debug, Clone, Serialize)]
pub struct PhraseCatalog {
    phrases: Vec<PhraseDefinition>,
}

impl PhraseCatalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and zero targets.
    pub fn new(phrases: Vec<PhraseDefinition>) -> Result<Self, ValidationError> {
        if phrases.is_empty() {
            return Err(ValidationError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for phrase in &phrases {
            if !seen.insert(phrase.id.as_str()) {
                return Err(ValidationError::DuplicatePhrase(phrase.id.clone()));
            }
            if phrase.default_target == 0 {
                return Err(ValidationError::TargetOutOfRange {
                    value: 0,
                    max: crate::targets::MAX_TARGET,
                });
            }
        }
        Ok(Self { phrases })
    }

    /// The phrases shipped with the app.
    pub fn builtin() -> Self {
        Self {
            phrases: vec![
                PhraseDefinition::new("subhanallah", "SubhanAllah", "سُبْحَانَ ٱللَّٰهِ", 33),
                PhraseDefinition::new("alhamdulillah", "Alhamdulillah", "ٱلْحَمْدُ لِلَّٰهِ", 33),
                PhraseDefinition::new("allahu_akbar", "Allahu Akbar", "ٱللَّٰهُ أَكْبَرُ", 34),
                PhraseDefinition::new(
                    "la_ilaha_illallah",
                    "La ilaha illallah",
                    "لَا إِلَٰهَ إِلَّا ٱللَّٰهُ",
                    100,
                ),
                PhraseDefinition::new("astaghfirullah", "Astaghfirullah", "أَسْتَغْفِرُ ٱللَّٰهَ", 100),
                PhraseDefinition::new(
                    "la_hawla_wala_quwwata",
                    "La hawla wala quwwata illa billah",
                    "لَا حَوْلَ وَلَا قُوَّةَ إِلَّا بِٱللَّٰهِ",
                    33,
                ),
                PhraseDefinition::new(
                    "salawat",
                    "Allahumma salli ala Muhammad",
                    "ٱللَّٰهُمَّ صَلِّ عَلَىٰ مُحَمَّدٍ",
                    10,
                ),
            ],
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Whether the catalog has no phrases. A constructed catalog never does.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrases(&self) -> &[PhraseDefinition] {
        &self.phrases
    }

    pub fn first(&self) -> &PhraseDefinition {
        &self.phrases[0]
    }

    pub fn get(&self, id: &str) -> Option<&PhraseDefinition> {
        self.phrases.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.phrases.iter().position(|p| p.id == id)
    }

    /// Phrase that follows `id` in the cycle. Unknown ids restart at the first phrase.
    pub fn next_after(&self, id: &str) -> &PhraseDefinition {
        let next = match self.index_of(id) {
            Some(i) => (i + 1) % self.phrases.len(),
            None => 0,
        };
        &self.phrases[next]
    }
}

impl Default for PhraseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let builtin = PhraseCatalog::builtin();
        let rebuilt = PhraseCatalog::new(builtin.phrases().to_vec()).unwrap();
        assert_eq!(rebuilt.len(), 7);
        assert!(!rebuilt.is_empty());
        assert_eq!(rebuilt.first().id, "subhanallah");
        assert_eq!(rebuilt.get("allahu_akbar").unwrap().default_target, 34);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert_eq!(
            PhraseCatalog::new(vec![]).unwrap_err(),
            ValidationError::EmptyCatalog
        );
        let dup = vec![
            PhraseDefinition::new("a", "A", "a", 1),
            PhraseDefinition::new("a", "A2", "a", 1),
        ];
        assert_eq!(
            PhraseCatalog::new(dup).unwrap_err(),
            ValidationError::DuplicatePhrase("a".into())
        );
    }

    #[test]
    fn rejects_zero_default_target() {
        let zero = vec![PhraseDefinition::new("a", "A", "a", 0)];
        assert!(PhraseCatalog::new(zero).is_err());
    }

    #[test]
    fn next_after_wraps_around() {
        let catalog = PhraseCatalog::new(vec![
            PhraseDefinition::new("a", "A", "a", 1),
            PhraseDefinition::new("b", "B", "b", 1),
            PhraseDefinition::new("c", "C", "c", 1),
        ])
        .unwrap();
        assert_eq!(catalog.next_after("a").id, "b");
        assert_eq!(catalog.next_after("c").id, "a");
        assert_eq!(catalog.next_after("missing").id, "a");
    }
}
