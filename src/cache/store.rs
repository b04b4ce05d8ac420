//! Index Store
//!
//! Sole owner of the primary map and every derived index. Mutation happens
//! through whole-set commits; readers receive copies or an immutable
//! `Arc<IndexSet>` snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard, RwLock};
use serde::Serialize;
use tracing::debug;

use super::classification::{AgeBracket, Gender, Kind};
use super::entry::{EntityId, EntityRecord, IdNameMap};

/// Primary map plus all secondary indexes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet {
    records: BTreeMap<EntityId, EntityRecord>,
    names: BTreeMap<String, EntityId>,
    females: IdNameMap,
    males: IdNameMap,
    ages: [IdNameMap; AgeBracket::COUNT],
    kinds: [IdNameMap; Kind::COUNT],
}

impl IndexSet {
    /// Create an empty index set
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive every index from a set of records
    pub fn from_records(records: impl IntoIterator<Item = EntityRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    /// Insert a record and update every derived index.
    ///
    /// Replacing an existing id first drops its old index entries.
    pub fn insert(&mut self, record: EntityRecord) {
        let id = record.id;
        debug_assert_ne!(id, 0, "id 0 must never be indexed");
        self.remove(id);

        if !record.has_fallback_name() {
            self.names.insert(record.search_name.clone(), id);
        }
        match record.gender {
            Some(Gender::Female) => {
                self.females.insert(id, record.name.clone());
            }
            Some(Gender::Male) => {
                self.males.insert(id, record.name.clone());
            }
            None => {}
        }
        if let Some(age) = record.age {
            self.ages[age.ordinal()].insert(id, record.name.clone());
        }
        for kind in &record.kinds {
            self.kinds[kind.ordinal()].insert(id, record.name.clone());
        }
        self.records.insert(id, record);
    }

    /// Remove a record and its index entries
    pub fn remove(&mut self, id: EntityId) -> Option<EntityRecord> {
        let old = self.records.remove(&id)?;
        if self.names.get(&old.search_name) == Some(&id) {
            self.names.remove(&old.search_name);
        }
        self.females.remove(&id);
        self.males.remove(&id);
        for index in self.ages.iter_mut().chain(self.kinds.iter_mut()) {
            index.remove(&id);
        }
        Some(old)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if an id is indexed
    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    /// Look up a record
    pub fn record(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records.get(&id)
    }

    /// Iterate records in id order
    pub fn records(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }

    /// Look up an id by exact search key (lower-cased `first#last`)
    pub fn id_for_name(&self, search_name: &str) -> Option<EntityId> {
        self.names.get(&search_name.to_lowercase()).copied()
    }

    /// Search key → id map
    pub fn names(&self) -> &BTreeMap<String, EntityId> {
        &self.names
    }

    /// Gender index
    pub fn gender(&self, gender: Gender) -> &IdNameMap {
        match gender {
            Gender::Female => &self.females,
            Gender::Male => &self.males,
        }
    }

    /// Age bracket index
    pub fn age(&self, bracket: AgeBracket) -> &IdNameMap {
        &self.ages[bracket.ordinal()]
    }

    /// Kind index
    pub fn kind(&self, kind: Kind) -> &IdNameMap {
        &self.kinds[kind.ordinal()]
    }
}

/// Serializable full copy of the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot {
    pub ready: bool,
    pub last_populated: Option<DateTime<Utc>>,
    pub records: Vec<EntityRecord>,
    pub names: BTreeMap<String, EntityId>,
    pub females: IdNameMap,
    pub males: IdNameMap,
    pub ages: BTreeMap<AgeBracket, IdNameMap>,
    pub kinds: BTreeMap<Kind, IdNameMap>,
}

#[derive(Debug, Default)]
struct StoreState {
    set: Arc<IndexSet>,
    ready: bool,
    last_populated: Option<DateTime<Utc>>,
}

/// Thread-safe owner of the current index set
#[derive(Debug, Default)]
pub struct IndexStore {
    state: RwLock<StoreState>,
    /// Serializes populate passes
    writer: Mutex<()>,
}

impl IndexStore {
    /// Create an empty, not-ready store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> Arc<IndexSet> {
        Arc::clone(&self.state.read().set)
    }

    /// Whether the last populate left usable data
    pub fn is_ready(&self) -> bool {
        self.state.read().ready
    }

    /// Time of the last committed populate
    pub fn last_populated(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_populated
    }

    /// Mark not ready, keeping the data for stale reads
    pub fn invalidate(&self) {
        self.state.write().ready = false;
        debug!("Index store invalidated");
    }

    /// Drop all data and mark not ready
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.set = Arc::new(IndexSet::new());
        state.ready = false;
        debug!("Index store cleared");
    }

    /// Replace the index set in one write
    pub(super) fn commit(&self, set: IndexSet, ready: bool) {
        let mut state = self.state.write();
        state.set = Arc::new(set);
        state.ready = ready;
        state.last_populated = Some(Utc::now());
    }

    pub(super) fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock()
    }

    /// Number of cached records
    pub fn len(&self) -> usize {
        self.state.read().set.len()
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.state.read().set.is_empty()
    }

    /// Check if an id is cached
    pub fn contains(&self, id: EntityId) -> bool {
        self.state.read().set.contains(id)
    }

    /// Copy of one record
    pub fn record(&self, id: EntityId) -> Option<EntityRecord> {
        self.state.read().set.record(id).cloned()
    }

    /// Copy of the primary map
    pub fn records(&self) -> BTreeMap<EntityId, EntityRecord> {
        self.state.read().set.records.clone()
    }

    /// Copy of the name map
    pub fn names(&self) -> BTreeMap<String, EntityId> {
        self.state.read().set.names.clone()
    }

    /// Full serializable copy
    pub fn dump(&self) -> CacheSnapshot {
        let state = self.state.read();
        let set = &state.set;
        CacheSnapshot {
            ready: state.ready,
            last_populated: state.last_populated,
            records: set.records.values().cloned().collect(),
            names: set.names.clone(),
            females: set.females.clone(),
            males: set.males.clone(),
            ages: AgeBracket::ALL
                .into_iter()
                .map(|a| (a, set.age(a).clone()))
                .collect(),
            kinds: Kind::ALL
                .into_iter()
                .map(|k| (k, set.kind(k).clone()))
                .collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: EntityId, first: &str, last: &str) -> EntityRecord {
        EntityRecord::new(id, first, last)
    }

    #[test]
    fn test_insert_updates_all_indexes() {
        let mut rec = record(1, "Bella", "Goth");
        rec.gender = Some(Gender::Female);
        rec.age = Some(AgeBracket::Adult);
        rec.kinds.insert(Kind::Human);
        rec.kinds.insert(Kind::Ghost);

        let mut set = IndexSet::new();
        set.insert(rec);

        assert_eq!(set.len(), 1);
        assert_eq!(set.id_for_name("Bella#Goth"), Some(1));
        assert_eq!(set.gender(Gender::Female).get(&1).unwrap(), "Bella#Goth");
        assert!(set.gender(Gender::Male).is_empty());
        assert!(set.age(AgeBracket::Adult).contains_key(&1));
        assert!(set.kind(Kind::Human).contains_key(&1));
        assert!(set.kind(Kind::Ghost).contains_key(&1));
        assert!(set.kind(Kind::Robot).is_empty());
    }

    #[test]
    fn test_replace_drops_stale_index_entries() {
        let mut set = IndexSet::new();
        let mut first = record(1, "Bella", "Goth");
        first.age = Some(AgeBracket::Teen);
        first.kinds.insert(Kind::Vampire);
        set.insert(first);

        let mut second = record(1, "Bella", "Goth");
        second.age = Some(AgeBracket::Adult);
        set.insert(second);

        assert!(set.age(AgeBracket::Teen).is_empty());
        assert!(set.age(AgeBracket::Adult).contains_key(&1));
        assert!(set.kind(Kind::Vampire).is_empty());
    }

    #[test]
    fn test_duplicate_search_name_last_write_wins() {
        let mut set = IndexSet::new();
        set.insert(record(1, "Bella", "Goth"));
        set.insert(record(2, "bella", "GOTH"));

        assert_eq!(set.id_for_name("bella#goth"), Some(2));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_fallback_name_not_in_name_map() {
        let mut set = IndexSet::new();
        set.insert(EntityRecord::unnamed(5));
        assert!(set.names().is_empty());
        assert!(set.contains(5));
    }

    #[test]
    fn test_entity_named_like_sentinel_is_searchable() {
        let mut set = IndexSet::new();
        set.insert(EntityRecord::unnamed(5));
        set.insert(record(6, "Unknown Firstname", "Unknown Lastname"));
        assert_eq!(set.id_for_name("unknown firstname#unknown lastname"), Some(6));
        assert_eq!(set.names().len(), 1);
    }

    #[test]
    fn test_from_records_is_deterministic() {
        let records = vec![record(2, "Don", "Lothario"), record(1, "Bella", "Goth")];
        let a = IndexSet::from_records(records.clone());
        let b = IndexSet::from_records(records.into_iter().rev());
        assert_eq!(a, b);
    }

    #[test]
    fn test_store_starts_empty_and_not_ready() {
        let store = IndexStore::new();
        assert!(store.is_empty());
        assert!(!store.is_ready());
        assert!(store.last_populated().is_none());
    }

    #[test]
    fn test_invalidate_keeps_data() {
        let store = IndexStore::new();
        store.commit(IndexSet::from_records([record(1, "Bella", "Goth")]), true);
        assert!(store.is_ready());

        store.invalidate();
        assert!(!store.is_ready());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_drops_data() {
        let store = IndexStore::new();
        store.commit(IndexSet::from_records([record(1, "Bella", "Goth")]), true);
        store.clear();
        assert!(store.is_empty());
        assert!(!store.is_ready());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_commits() {
        let store = IndexStore::new();
        store.commit(IndexSet::from_records([record(1, "Bella", "Goth")]), true);
        let before = store.snapshot();

        store.clear();
        assert_eq!(before.len(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_dump_lists_every_bracket_and_kind() {
        let store = IndexStore::new();
        let dump = store.dump();
        assert_eq!(dump.ages.len(), AgeBracket::COUNT);
        assert_eq!(dump.kinds.len(), Kind::COUNT);
        assert!(dump.records.is_empty());
    }
}
