//! Entity Record Types

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::classification::{AgeBracket, Gender, Kind};
use super::{NAME_SEPARATOR, UNKNOWN_NAME};

/// Numeric entity identifier (never zero inside the cache)
pub type EntityId = u64;

/// `{id: display name}` result map returned by every query
pub type IdNameMap = BTreeMap<EntityId, String>;

/// One cached entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Identifier
    pub id: EntityId,
    /// Display name, `first#last`
    pub name: String,
    /// Lower-cased `name`, used for matching
    pub search_name: String,
    /// Gender, if the host reported one
    pub gender: Option<Gender>,
    /// Age bracket, if it could be resolved
    pub age: Option<AgeBracket>,
    /// All kinds the entity belongs to
    pub kinds: BTreeSet<Kind>,
    /// Name is the sentinel because the host could not resolve one
    #[serde(default)]
    fallback_name: bool,
}

impl EntityRecord {
    /// Create a record from first and last name
    pub fn new(id: EntityId, first: &str, last: &str) -> Self {
        Self::with_name(id, compose_name(first, last), false)
    }

    /// Create a record carrying the sentinel name
    pub fn unnamed(id: EntityId) -> Self {
        Self::with_name(id, UNKNOWN_NAME.to_string(), true)
    }

    fn with_name(id: EntityId, name: String, fallback_name: bool) -> Self {
        let search_name = name.to_lowercase();
        Self {
            id,
            name,
            search_name,
            gender: None,
            age: None,
            kinds: BTreeSet::new(),
            fallback_name,
        }
    }

    /// Whether the sentinel name was used because name resolution failed
    pub fn has_fallback_name(&self) -> bool {
        self.fallback_name
    }

    /// Split the search key into (first, last)
    pub fn search_parts(&self) -> (&str, &str) {
        split_name(&self.search_name)
    }

    /// Check kind membership
    #[inline]
    pub fn has_kind(&self, kind: Kind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Join first and last name with the separator
pub fn compose_name(first: &str, last: &str) -> String {
    format!("{}{}{}", first, NAME_SEPARATOR, last)
}

/// Split on the first separator. A name without one is all first name.
pub fn split_name(name: &str) -> (&str, &str) {
    name.split_once(NAME_SEPARATOR).unwrap_or((name, ""))
}

/// Placeholder returned for ids that are not cached
pub fn missing_placeholder(id: EntityId) -> String {
    format!("{}{}{}", id, NAME_SEPARATOR, id)
}
