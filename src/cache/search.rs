//! Tiered Name Search
//!
//! Matches a `first#last` query against each record's search key, part by
//! part, in four tiers of decreasing strength:
//!
//! | Tier     | first part            | last part             |
//! |----------|-----------------------|-----------------------|
//! | Exact    | `==`                  | `==`                  |
//! | Prefix   | `starts_with`         | `starts_with`         |
//! | Suffix   | `ends_with`           | `ends_with`           |
//! | Contains | `contains`            | `contains`            |
//!
//! Examples against `Bella#Goth`: `bella#goth` is exact, `be#g` a prefix,
//! `la#th` a suffix, `ll#ot` a substring match.

use std::fmt;

use serde::Serialize;

use super::entry::{split_name, EntityRecord, IdNameMap};
use super::NAME_SEPARATOR;

/// Match strength, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MatchTier {
    Exact,
    Prefix,
    Suffix,
    Contains,
}

impl MatchTier {
    /// All tiers in priority order
    pub const ALL: [MatchTier; 4] = [
        MatchTier::Exact,
        MatchTier::Prefix,
        MatchTier::Suffix,
        MatchTier::Contains,
    ];

    /// Test one (first, last) pair against a query
    #[inline]
    pub fn matches(self, record: (&str, &str), query: (&str, &str)) -> bool {
        let ((first, last), (q_first, q_last)) = (record, query);
        match self {
            MatchTier::Exact => first == q_first && last == q_last,
            MatchTier::Prefix => first.starts_with(q_first) && last.starts_with(q_last),
            MatchTier::Suffix => first.ends_with(q_first) && last.ends_with(q_last),
            MatchTier::Contains => first.contains(q_first) && last.contains(q_last),
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "equals"),
            MatchTier::Prefix => write!(f, "starts"),
            MatchTier::Suffix => write!(f, "ends"),
            MatchTier::Contains => write!(f, "contains"),
        }
    }
}

/// Normalized name query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    first: String,
    last: String,
}

impl NameQuery {
    /// Lower-case and split on the first separator.
    ///
    /// A query without a separator is all first name with an empty last
    /// name, so `""` and `"#"` both match every record.
    pub fn parse(query: &str) -> Self {
        let lowered = query.to_lowercase();
        let (first, last) = split_name(&lowered);
        Self {
            first: first.to_string(),
            last: last.to_string(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    fn parts(&self) -> (&str, &str) {
        (&self.first, &self.last)
    }
}

impl fmt::Display for NameQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.first, NAME_SEPARATOR, self.last)
    }
}

/// Per-tier search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameMatches {
    pub equals: IdNameMap,
    pub starts: IdNameMap,
    pub ends: IdNameMap,
    pub contains: IdNameMap,
}

impl NameMatches {
    /// Evaluate every record against every tier.
    ///
    /// An exact match is not tested further. Any other record is tested
    /// against prefix, suffix and contains independently and may land in
    /// several of them.
    pub fn collect<'a>(records: impl IntoIterator<Item = &'a EntityRecord>, query: &NameQuery) -> Self {
        let mut matches = Self::default();
        let q = query.parts();

        for record in records {
            let parts = record.search_parts();
            if MatchTier::Exact.matches(parts, q) {
                matches.equals.insert(record.id, record.name.clone());
                continue;
            }
            for tier in [MatchTier::Prefix, MatchTier::Suffix, MatchTier::Contains] {
                if tier.matches(parts, q) {
                    matches.tier_mut(tier).insert(record.id, record.name.clone());
                }
            }
        }
        matches
    }

    /// Results for one tier
    pub fn tier(&self, tier: MatchTier) -> &IdNameMap {
        match tier {
            MatchTier::Exact => &self.equals,
            MatchTier::Prefix => &self.starts,
            MatchTier::Suffix => &self.ends,
            MatchTier::Contains => &self.contains,
        }
    }

    fn tier_mut(&mut self, tier: MatchTier) -> &mut IdNameMap {
        match tier {
            MatchTier::Exact => &mut self.equals,
            MatchTier::Prefix => &mut self.starts,
            MatchTier::Suffix => &mut self.ends,
            MatchTier::Contains => &mut self.contains,
        }
    }

    /// Strongest non-empty tier
    pub fn best_tier(&self) -> Option<MatchTier> {
        MatchTier::ALL
            .into_iter()
            .find(|&tier| !self.tier(tier).is_empty())
    }

    /// Results of the strongest non-empty tier, or an empty map
    pub fn into_best(self) -> IdNameMap {
        match self.best_tier() {
            Some(MatchTier::Exact) => self.equals,
            Some(MatchTier::Prefix) => self.starts,
            Some(MatchTier::Suffix) => self.ends,
            Some(MatchTier::Contains) => self.contains,
            None => IdNameMap::new(),
        }
    }

    /// Total hits across tiers (a record may be counted more than once)
    pub fn total(&self) -> usize {
        self.equals.len() + self.starts.len() + self.ends.len() + self.contains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// =============================================================================
// Tests
// =============================================================================
