use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The travel theme a destination is classified under.
///
/// Declaration order is the canonical order: whenever a single category has
/// to be picked among equals (for example the dominant vibe of a cluster with
/// tied counts), the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VibeCategory {
    Adventure,
    Romantic,
    Cultural,
    Beach,
    Nightlife,
    Nature,
}

impl VibeCategory {
    /// Number of categories.
    pub const COUNT: usize = 6;

    /// All categories in canonical order.
    pub const ALL: [VibeCategory; Self::COUNT] = [
        VibeCategory::Adventure,
        VibeCategory::Romantic,
        VibeCategory::Cultural,
        VibeCategory::Beach,
        VibeCategory::Nightlife,
        VibeCategory::Nature,
    ];

    /// Position of this category in the canonical order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Category at a canonical position, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase name, as used in serialized output.
    pub const fn as_str(self) -> &'static str {
        match self {
            VibeCategory::Adventure => "adventure",
            VibeCategory::Romantic => "romantic",
            VibeCategory::Cultural => "cultural",
            VibeCategory::Beach => "beach",
            VibeCategory::Nightlife => "nightlife",
            VibeCategory::Nature => "nature",
        }
    }
}

static NAME_LOOKUP: Lazy<FxHashMap<&'static str, VibeCategory>> = Lazy::new(|| {
    VibeCategory::ALL
        .iter()
        .map(|category| (category.as_str(), *category))
        .collect()
});

impl fmt::Display for VibeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown vibe category: {:?}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for VibeCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        NAME_LOOKUP
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_matches_index() {
        for (i, category) in VibeCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
            assert_eq!(VibeCategory::from_index(i), Some(*category));
        }
        assert_eq!(VibeCategory::from_index(VibeCategory::COUNT), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Beach".parse::<VibeCategory>(), Ok(VibeCategory::Beach));
        assert_eq!(" nightlife ".parse::<VibeCategory>(), Ok(VibeCategory::Nightlife));
        assert!("mountains".parse::<VibeCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&VibeCategory::Romantic).unwrap();
        assert_eq!(json, "\"romantic\"");
        let back: VibeCategory = serde_json::from_str("\"nature\"").unwrap();
        assert_eq!(back, VibeCategory::Nature);
    }
}
