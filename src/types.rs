use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::display::BadgeColor;
use crate::error::{InterEdError, Result};

/// Server-assigned numeric identifier of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const fn new(id: u64) -> Self {
        EntityId(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = InterEdError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('#');
        match trimmed.parse::<u64>() {
            Ok(id) if id > 0 => Ok(EntityId(id)),
            _ => Err(InterEdError::InvalidId(s.to_string())),
        }
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

/// A closed set of status/stage values with a fallback for values the
/// server sends that this client does not know.
///
/// Implemented by the `vocabulary!` macro.
pub trait Vocabulary: Clone + PartialEq + fmt::Display + Send + Sync + 'static {
    /// Human-readable name of the vocabulary, used in error messages
    const KIND: &'static str;

    /// Canonical wire values, in display order
    fn values() -> &'static [&'static str];

    /// Parse a wire value, keeping unknown values verbatim
    fn parse_lossy(s: &str) -> Self;

    /// Canonical wire value (or the raw value for unknowns)
    fn as_str(&self) -> &str;

    /// Title-cased label for display
    fn label(&self) -> &str;

    /// Badge color; unknown values render gray
    fn badge(&self) -> BadgeColor;

    fn is_known(&self) -> bool;
}

/// Sentinel tab value that disables tab filtering
pub const TAB_ALL: &str = "all";

/// Active tab/category filter of a list screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TabFilter {
    #[default]
    All,
    Value(String),
}

impl TabFilter {
    /// Parse a user-supplied tab against a vocabulary.
    ///
    /// Accepts the sentinel `all` or any canonical value (case-insensitive),
    /// and stores the canonical spelling.
    pub fn parse<V: Vocabulary>(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        if lower == TAB_ALL {
            return Ok(TabFilter::All);
        }
        V::values()
            .iter()
            .find(|v| **v == lower)
            .map(|v| TabFilter::Value((*v).to_string()))
            .ok_or_else(|| InterEdError::InvalidVocabulary {
                kind: V::KIND,
                value: s.to_string(),
                expected: std::iter::once(TAB_ALL)
                    .chain(V::values().iter().copied())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Whether a record's tab value passes this filter.
    ///
    /// Exact, case-sensitive comparison; unknown values never match a
    /// concrete tab.
    pub fn matches<V: Vocabulary>(&self, value: &V) -> bool {
        match self {
            TabFilter::All => true,
            TabFilter::Value(tab) => value.is_known() && value.as_str() == tab,
        }
    }
}

impl fmt::Display for TabFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabFilter::All => write!(f, "{TAB_ALL}"),
            TabFilter::Value(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::StudentStage;

    #[test]
    fn test_entity_id_parse() {
        assert_eq!("42".parse::<EntityId>().unwrap(), EntityId::new(42));
        assert_eq!("#42".parse::<EntityId>().unwrap(), EntityId::new(42));
        assert!("0".parse::<EntityId>().is_err());
        assert!("-1".parse::<EntityId>().is_err());
        assert!("abc".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_entity_id_serde_transparent() {
        let id: EntityId = serde_json::from_str("17").unwrap();
        assert_eq!(id.get(), 17);
        assert_eq!(serde_json::to_string(&id).unwrap(), "17");
    }

    #[test]
    fn test_tab_filter_parse() {
        assert_eq!(
            TabFilter::parse::<StudentStage>("all").unwrap(),
            TabFilter::All
        );
        assert_eq!(
            TabFilter::parse::<StudentStage>("Offer").unwrap(),
            TabFilter::Value("offer".to_string())
        );
        let err = TabFilter::parse::<StudentStage>("graduated").unwrap_err();
        assert!(err.to_string().contains("inquiry"));
    }

    #[test]
    fn test_tab_filter_unknown_never_matches_concrete_tab() {
        let unknown = StudentStage::parse_lossy("deferred");
        assert!(TabFilter::All.matches(&unknown));
        assert!(!TabFilter::Value("deferred".to_string()).matches(&unknown));
        assert!(TabFilter::Value("visa".to_string()).matches(&StudentStage::Visa));
    }
}
