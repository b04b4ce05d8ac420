//! Cache Manager - Lifecycle Controller
//!
//! Owns the index store and the entity source, and decides when the store
//! is populated and when it is freed.
//!
//! - **Resident**: populated once, kept until cleared or refreshed.
//! - **Ephemeral**: every query group populates the store first and clears
//!   it afterwards, so no memory is held between groups.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::entry::{EntityId, IdNameMap};
use super::metrics::{CacheMetrics, MetricsSnapshot};
use super::populate::PopulateReport;
use super::search::NameMatches;
use super::store::{CacheSnapshot, IndexStore};
use crate::domain::events::LifecycleEvent;
use crate::domain::ports::EntitySource;
use crate::error::Result;

/// Memory allocation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryMode {
    /// Keep data between query groups
    #[default]
    Resident,
    /// Rebuild for every query group, free afterwards
    Ephemeral,
}

impl MemoryMode {
    pub fn from_resident(resident: bool) -> Self {
        if resident {
            MemoryMode::Resident
        } else {
            MemoryMode::Ephemeral
        }
    }
}

impl fmt::Display for MemoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryMode::Resident => write!(f, "resident"),
            MemoryMode::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Initial memory mode
    pub memory_mode: MemoryMode,
    /// Default for `by_ids` when the caller does not say
    pub include_missing_by_default: bool,
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of cached records
    pub entities: usize,
    /// Number of entries in the name map
    pub names: usize,
    /// Whether the store is ready
    pub ready: bool,
    /// Current memory mode
    pub memory_mode: MemoryMode,
    /// Time of the last populate
    pub last_populated: Option<DateTime<Utc>>,
    /// Counters
    pub metrics: MetricsSnapshot,
}

/// Entity cache bound to one host entity source
pub struct SimCache<S: EntitySource> {
    store: IndexStore,
    source: S,
    config: RwLock<CacheConfig>,
    metrics: Arc<CacheMetrics>,
}

impl<S: EntitySource> SimCache<S> {
    /// Create a resident cache. Nothing is read until the first populate.
    pub fn new(source: S) -> Self {
        Self::with_config(CacheConfig::default(), source)
    }

    /// Create a cache with custom configuration
    pub fn with_config(config: CacheConfig, source: S) -> Self {
        Self {
            store: IndexStore::new(),
            source,
            config: RwLock::new(config),
            metrics: Arc::new(CacheMetrics::new()),
        }
    }

    /// The underlying index store
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// The entity source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Arc<CacheMetrics> {
        &self.metrics
    }

    /// Current configuration
    pub fn config(&self) -> CacheConfig {
        self.config.read().clone()
    }

    pub fn memory_mode(&self) -> MemoryMode {
        self.config.read().memory_mode
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Populate the store. `force` clears it first.
    pub fn refresh(&self, force: bool) -> Result<PopulateReport> {
        let report = self.store.populate(&self.source, force)?;
        self.metrics.record_populate(
            report.forced,
            report.skipped_ready,
            report.indexed,
            report.skipped_existing + report.skipped_invalid,
        );
        Ok(report)
    }

    /// Mark the store stale; data stays readable until the next populate
    pub fn invalidate(&self) {
        self.store.invalidate();
        self.metrics.record_invalidation();
    }

    /// Drop all cached data
    pub fn clear(&self) {
        self.store.clear();
        self.metrics.record_clear();
    }

    /// Switch memory mode.
    ///
    /// Becoming resident populates right away; becoming ephemeral frees the
    /// store right away.
    pub fn set_memory_mode(&self, mode: MemoryMode) -> Result<()> {
        self.config.write().memory_mode = mode;
        info!(mode = %mode, "Memory mode changed");
        match mode {
            MemoryMode::Resident => self.refresh(false).map(|_| ()),
            MemoryMode::Ephemeral => {
                self.clear();
                Ok(())
            }
        }
    }

    /// React to a host lifecycle event
    pub fn handle_event(&self, event: &LifecycleEvent) -> Result<()> {
        debug!(event_type = event.event_type(), world = event.world(), "Lifecycle event");
        match event {
            LifecycleEvent::WorldLoaded { .. } => self.on_world_loaded().map(|_| ()),
            LifecycleEvent::WorldTeardown { .. } => {
                self.on_world_teardown();
                Ok(())
            }
        }
    }

    /// World entered or changed: non-destructive populate
    pub fn on_world_loaded(&self) -> Result<PopulateReport> {
        debug!("Updating cache");
        self.refresh(false)
    }

    /// World exiting: soft invalidate so the next load repopulates
    pub fn on_world_teardown(&self) {
        debug!("Invalidating cache");
        self.invalidate();
    }

    /// Run `f` as one query group.
    ///
    /// In ephemeral mode the store is populated before `f` and cleared after
    /// it, even if `f` returned nothing useful.
    pub fn with_query_group<T>(&self, f: impl FnOnce(&IndexStore) -> T) -> Result<T> {
        let ephemeral = self.memory_mode() == MemoryMode::Ephemeral;
        if ephemeral {
            self.refresh(false)?;
        }
        let out = f(&self.store);
        self.metrics.record_query();
        if ephemeral {
            self.clear();
        }
        Ok(out)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// `{id: name}` for the given ids
    pub fn by_ids(&self, ids: &[EntityId], include_missing: bool) -> Result<IdNameMap> {
        self.with_query_group(|store| {
            let (found, hits) = store.by_ids_counted(ids, include_missing);
            self.metrics
                .record_id_lookups(hits, ids.len().saturating_sub(hits));
            found
        })
    }

    /// `by_ids` using the configured missing-id default
    pub fn by_ids_default(&self, ids: &[EntityId]) -> Result<IdNameMap> {
        let include_missing = self.config.read().include_missing_by_default;
        self.by_ids(ids, include_missing)
    }

    /// Union of the named kind indexes
    pub fn by_kinds<I>(&self, kinds: I) -> Result<IdNameMap>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.with_query_group(|store| store.by_kinds(kinds))
    }

    /// Union of the named age indexes
    pub fn by_age_brackets<I>(&self, brackets: I) -> Result<IdNameMap>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.with_query_group(|store| store.by_age_brackets(brackets))
    }

    /// Female or male index
    pub fn by_gender(&self, is_female: bool) -> Result<IdNameMap> {
        self.with_query_group(|store| store.by_gender(is_female))
    }

    /// Best-tier name search
    pub fn search(&self, query: &str) -> Result<IdNameMap> {
        self.with_query_group(|store| store.by_name(query))
    }

    /// All-tier name search
    pub fn search_detailed(&self, query: &str) -> Result<NameMatches> {
        self.with_query_group(|store| store.by_name_detailed(query))
    }

    /// Full copy of the store
    pub fn dump(&self) -> Result<CacheSnapshot> {
        self.with_query_group(|store| store.dump())
    }

    /// Current statistics (does not trigger a populate)
    pub fn stats(&self) -> CacheStats {
        let snapshot = self.store.snapshot();
        CacheStats {
            entities: snapshot.len(),
            names: snapshot.names().len(),
            ready: self.store.is_ready(),
            memory_mode: self.memory_mode(),
            last_populated: self.store.last_populated(),
            metrics: self.metrics.snapshot(),
        }
    }
}

impl<S: EntitySource> fmt::Debug for SimCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimCache")
            .field("entities", &self.store.len())
            .field("ready", &self.store.is_ready())
            .field("memory_mode", &self.memory_mode())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEntitySource, RosterEntity};
    use crate::cache::{AgeBracket, Kind};
    use crate::error::Error;
    use assert_matches::assert_matches;

    fn roster() -> Vec<RosterEntity> {
        vec![
            RosterEntity::new(1, "Bella", "Goth")
                .female()
                .age(AgeBracket::Adult)
                .kinds([Kind::Human]),
            RosterEntity::new(2, "Bello", "Gothic")
                .male()
                .age(AgeBracket::Teen)
                .kinds([Kind::Human]),
            RosterEntity::new(3, "Servo", "Unit").robot(),
        ]
    }

    fn cache() -> SimCache<InMemoryEntitySource> {
        SimCache::new(InMemoryEntitySource::new(roster()))
    }

    #[test]
    fn test_resident_cache_needs_explicit_refresh() {
        let cache = cache();
        assert!(cache.search("#").unwrap().is_empty());

        cache.refresh(false).unwrap();
        assert_eq!(cache.search("#").unwrap().len(), 3);
        assert_eq!(cache.store().len(), 3);
    }

    #[test]
    fn test_search_prefers_exact() {
        let cache = cache();
        cache.refresh(false).unwrap();

        let result = cache.search("bella#goth").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(&1).unwrap(), "Bella#Goth");
    }

    #[test]
    fn test_ephemeral_mode_frees_after_each_group() {
        let cache = cache();
        cache.set_memory_mode(MemoryMode::Ephemeral).unwrap();
        assert!(cache.store().is_empty());

        let first = cache.by_kinds(["HUMAN"]).unwrap();
        assert!(cache.store().is_empty());
        assert!(!cache.store().is_ready());

        let second = cache.by_kinds(["HUMAN"]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_query_group_batches_queries() {
        let cache = cache();
        cache.set_memory_mode(MemoryMode::Ephemeral).unwrap();

        let (robots, women) = cache
            .with_query_group(|store| (store.by_kind(Kind::Robot), store.by_gender(true)))
            .unwrap();
        assert_eq!(robots.len(), 1);
        assert_eq!(women.len(), 1);
        assert!(cache.store().is_empty());
    }

    #[test]
    fn test_switch_to_resident_populates() {
        let cache = cache();
        cache.set_memory_mode(MemoryMode::Ephemeral).unwrap();
        cache.set_memory_mode(MemoryMode::Resident).unwrap();

        assert!(cache.store().is_ready());
        assert_eq!(cache.store().len(), 3);
    }

    #[test]
    fn test_world_events() {
        let cache = cache();
        cache
            .handle_event(&LifecycleEvent::world_loaded("willow-creek"))
            .unwrap();
        assert!(cache.store().is_ready());

        cache
            .handle_event(&LifecycleEvent::world_teardown("willow-creek"))
            .unwrap();
        assert!(!cache.store().is_ready());
        // Stale data still served
        assert_eq!(cache.by_gender(true).unwrap().len(), 1);

        cache.source().push(RosterEntity::new(4, "Don", "Lothario").male());
        cache
            .handle_event(&LifecycleEvent::world_loaded("willow-creek"))
            .unwrap();
        assert_eq!(cache.by_gender(false).unwrap().len(), 2);
        assert!(cache.store().is_ready());
    }

    #[test]
    fn test_by_ids_records_metrics() {
        let cache = cache();
        cache.refresh(false).unwrap();

        let result = cache.by_ids(&[1, 999], true).unwrap();
        assert_eq!(result.get(&999).unwrap(), "999#999");

        let stats = cache.stats();
        assert_eq!(stats.metrics.id_hits, 1);
        assert_eq!(stats.metrics.id_misses, 1);
        assert_eq!(stats.metrics.queries, 1);
    }

    #[test]
    fn test_by_ids_default_uses_config() {
        let config = CacheConfig {
            include_missing_by_default: true,
            ..Default::default()
        };
        let cache = SimCache::with_config(config, InMemoryEntitySource::new(roster()));
        cache.refresh(false).unwrap();

        assert_eq!(cache.by_ids_default(&[42]).unwrap().len(), 1);
    }

    #[test]
    fn test_ephemeral_query_propagates_source_failure() {
        let cache = cache();
        cache.set_memory_mode(MemoryMode::Ephemeral).unwrap();
        cache.source().fail_next("zone not loaded");

        assert_matches!(cache.search("#"), Err(Error::Host(_)));
    }

    #[test]
    fn test_stats() {
        let cache = cache();
        cache.refresh(false).unwrap();
        cache.refresh(false).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.entities, 3);
        assert_eq!(stats.names, 3);
        assert!(stats.ready);
        assert_eq!(stats.memory_mode, MemoryMode::Resident);
        assert_eq!(stats.metrics.populate_runs, 2);
        assert_eq!(stats.metrics.populate_noops, 1);
    }

    #[test]
    fn test_memory_mode_from_resident() {
        assert_eq!(MemoryMode::from_resident(true), MemoryMode::Resident);
        assert_eq!(MemoryMode::from_resident(false), MemoryMode::Ephemeral);
        assert_eq!(MemoryMode::Ephemeral.to_string(), "ephemeral");
    }
}
