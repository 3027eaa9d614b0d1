//! Language label normalization.
//!
//! Editors send free-form labels ("Python", "C++", "typescript"). The lint
//! dispatcher keys its backend table on the canonical lowercase tag.

use std::fmt;

/// Display labels that don't lowercase to their canonical tag.
const ALIASES: &[(&str, &str)] = &[("c++", "cpp")];

/// Canonical lowercase language tag. Empty when the label was absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Normalize a free-form label. Never fails.
    pub fn normalize(label: Option<&str>) -> Self {
        let Some(label) = label.filter(|l| !l.is_empty()) else {
            return Self::default();
        };
        let lower = label.to_lowercase();
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, tag)| (*tag).to_string())
            .unwrap_or(lower);
        Self(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(label: &str) -> Self {
        Self::normalize(Some(label))
    }
}
