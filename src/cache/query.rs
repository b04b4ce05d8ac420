//! Query Engine
//!
//! Read-side operations on [`IndexStore`]. Every query works on one
//! snapshot, so a concurrent populate never shows through half-way.

use tracing::warn;

use super::classification::{AgeBracket, Gender, Kind};
use super::entry::{missing_placeholder, EntityId, IdNameMap};
use super::search::{NameMatches, NameQuery};
use super::store::IndexStore;

impl IndexStore {
    /// `{id: name}` for each requested id.
    ///
    /// With `include_missing`, ids that are not cached map to `"{id}#{id}"`;
    /// otherwise they are left out.
    pub fn by_ids(&self, ids: &[EntityId], include_missing: bool) -> IdNameMap {
        self.by_ids_counted(ids, include_missing).0
    }

    /// `by_ids` plus the number of requested ids that were cached, both
    /// taken from the same snapshot.
    pub fn by_ids_counted(&self, ids: &[EntityId], include_missing: bool) -> (IdNameMap, usize) {
        let set = self.snapshot();
        let mut out = IdNameMap::new();
        let mut hits = 0;
        for &id in ids {
            match set.record(id) {
                Some(record) => {
                    out.insert(id, record.name.clone());
                    hits += 1;
                }
                None if include_missing => {
                    out.insert(id, missing_placeholder(id));
                }
                None => {}
            }
        }
        (out, hits)
    }

    /// Copy of one kind index
    pub fn by_kind(&self, kind: Kind) -> IdNameMap {
        self.snapshot().kind(kind).clone()
    }

    /// Copy of one age index
    pub fn by_age_bracket(&self, bracket: AgeBracket) -> IdNameMap {
        self.snapshot().age(bracket).clone()
    }

    /// Union of the named kind indexes. Unknown names are logged and skipped.
    pub fn by_kinds<I>(&self, kinds: I) -> IdNameMap
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let set = self.snapshot();
        let mut out = IdNameMap::new();
        for name in kinds {
            match name.as_ref().parse::<Kind>() {
                Ok(kind) => out.extend(set.kind(kind).iter().map(|(id, n)| (*id, n.clone()))),
                Err(e) => warn!(error = %e, "Ignoring kind"),
            }
        }
        out
    }

    /// Union of the named age indexes. Unknown names are logged and skipped.
    pub fn by_age_brackets<I>(&self, brackets: I) -> IdNameMap
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let set = self.snapshot();
        let mut out = IdNameMap::new();
        for name in brackets {
            match name.as_ref().parse::<AgeBracket>() {
                Ok(age) => out.extend(set.age(age).iter().map(|(id, n)| (*id, n.clone()))),
                Err(e) => warn!(error = %e, "Ignoring age bracket"),
            }
        }
        out
    }

    /// Female or male index
    pub fn by_gender(&self, is_female: bool) -> IdNameMap {
        let gender = if is_female {
            Gender::Female
        } else {
            Gender::Male
        };
        self.snapshot().gender(gender).clone()
    }

    /// Records of the strongest non-empty match tier
    pub fn by_name(&self, query: &str) -> IdNameMap {
        self.by_name_detailed(query).into_best()
    }

    /// All four match tiers
    pub fn by_name_detailed(&self, query: &str) -> NameMatches {
        let set = self.snapshot();
        NameMatches::collect(set.records(), &NameQuery::parse(query))
    }
}

// =============================================================================
// Tests
// =============================================================================
