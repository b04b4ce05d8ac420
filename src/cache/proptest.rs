//! Property-Based Tests for the Entity Cache
//!
//! # Test Properties
//!
//! 1. **Idempotence**: populate(false) twice yields the same primary map
//! 2. **Refresh Determinism**: populate(true) equals populate on an empty store
//! 3. **Index Consistency**: every secondary entry agrees with its record
//! 4. **Tier Priority**: the best tier is the first non-empty detailed tier
//! 5. **Ephemeral Round Trip**: every query group sees the same data

#![cfg(test)]

use proptest::prelude::*;

use super::classification::{AgeBracket, Gender, Kind};
use super::manager::{MemoryMode, SimCache};
use super::search::MatchTier;
use super::store::{IndexSet, IndexStore};
use crate::adapters::{InMemoryEntitySource, RosterEntity};

// =============================================================================
// Property Strategies
// =============================================================================

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{0,6}"
}

fn kind_strategy() -> impl Strategy<Value = Vec<Kind>> {
    prop::collection::vec(prop::sample::select(Kind::ALL.to_vec()), 0..4)
}

fn entity_strategy() -> impl Strategy<Value = RosterEntity> {
    (
        prop::option::weighted(0.9, 0u64..40),
        prop::option::weighted(0.9, name_strategy()),
        name_strategy(),
        prop::option::of(prop::sample::select(vec![Gender::Female, Gender::Male])),
        prop::option::weighted(0.8, prop::sample::select(AgeBracket::ALL.to_vec())),
        kind_strategy(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(id, first, last, gender, age, kinds, ghost, witch)| {
            let mut entity = RosterEntity {
                id,
                first_name: first,
                last_name: Some(last),
                gender,
                kinds,
                ghost,
                witch,
                ..Default::default()
            };
            if let Some(age) = age {
                entity = entity.age(age);
            }
            entity
        })
}

fn roster_strategy() -> impl Strategy<Value = Vec<RosterEntity>> {
    prop::collection::vec(entity_strategy(), 0..30)
}

fn assert_consistent(set: &IndexSet) {
    for kind in Kind::ALL {
        for (id, name) in set.kind(kind) {
            let record = set.record(*id).expect("kind index id missing from primary map");
            assert!(record.has_kind(kind));
            assert_eq!(&record.name, name);
        }
    }
    for age in AgeBracket::ALL {
        for id in set.age(age).keys() {
            assert_eq!(set.record(*id).map(|r| r.age), Some(Some(age)));
        }
    }
    for gender in [Gender::Female, Gender::Male] {
        for id in set.gender(gender).keys() {
            assert_eq!(set.record(*id).map(|r| r.gender), Some(Some(gender)));
        }
    }
    for (name, id) in set.names() {
        assert_eq!(set.record(*id).map(|r| r.search_name.as_str()), Some(name.as_str()));
    }
    assert!(!set.contains(0));
}

// =============================================================================
// Populate Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_populate_is_idempotent(roster in roster_strategy()) {
        let source = InMemoryEntitySource::new(roster);
        let store = IndexStore::new();

        store.populate(&source, false).unwrap();
        let first = store.records();
        store.invalidate();
        store.populate(&source, false).unwrap();

        prop_assert_eq!(first, store.records());
    }

    #[test]
    fn prop_force_refresh_matches_fresh_populate(roster in roster_strategy(), extra in roster_strategy()) {
        let source = InMemoryEntitySource::new(extra);
        let refreshed = IndexStore::new();
        refreshed.populate(&source, false).unwrap();
        source.replace(roster);
        refreshed.populate(&source, true).unwrap();

        let fresh = IndexStore::new();
        fresh.populate(&source, false).unwrap();

        let (refreshed, fresh) = (refreshed.snapshot(), fresh.snapshot());
        prop_assert_eq!(&*refreshed, &*fresh);
    }

    #[test]
    fn prop_secondary_indexes_are_consistent(roster in roster_strategy()) {
        let store = IndexStore::new();
        store.populate(&InMemoryEntitySource::new(roster), false).unwrap();
        assert_consistent(&store.snapshot());
    }

    #[test]
    fn prop_rederiving_indexes_is_idempotent(roster in roster_strategy()) {
        let store = IndexStore::new();
        store.populate(&InMemoryEntitySource::new(roster), false).unwrap();
        let set = store.snapshot();

        // The name map is last-write-wins on duplicate keys, so only the
        // id-keyed indexes are compared.
        let rederived = IndexSet::from_records(set.records().cloned());
        prop_assert!(set.records().eq(rederived.records()));
        for kind in Kind::ALL {
            prop_assert_eq!(set.kind(kind), rederived.kind(kind));
        }
        for age in AgeBracket::ALL {
            prop_assert_eq!(set.age(age), rederived.age(age));
        }
        for gender in [Gender::Female, Gender::Male] {
            prop_assert_eq!(set.gender(gender), rederived.gender(gender));
        }
    }
}

// =============================================================================
// Query Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_best_tier_is_first_non_empty(roster in roster_strategy(), query in "[a-z]{0,3}(#[a-z]{0,3})?") {
        let store = IndexStore::new();
        store.populate(&InMemoryEntitySource::new(roster), false).unwrap();

        let detailed = store.by_name_detailed(&query);
        let expected = MatchTier::ALL
            .into_iter()
            .map(|tier| detailed.tier(tier).clone())
            .find(|m| !m.is_empty())
            .unwrap_or_default();
        prop_assert_eq!(store.by_name(&query), expected);
    }

    #[test]
    fn prop_exact_matches_never_repeat_in_weaker_tiers(roster in roster_strategy(), query in "[a-z]{0,3}#[a-z]{0,3}") {
        let store = IndexStore::new();
        store.populate(&InMemoryEntitySource::new(roster), false).unwrap();

        let detailed = store.by_name_detailed(&query);
        for id in detailed.equals.keys() {
            prop_assert!(!detailed.starts.contains_key(id));
            prop_assert!(!detailed.ends.contains_key(id));
            prop_assert!(!detailed.contains.contains_key(id));
        }
    }

    #[test]
    fn prop_ephemeral_round_trip(roster in roster_strategy()) {
        let cache = SimCache::new(InMemoryEntitySource::new(roster));
        cache.set_memory_mode(MemoryMode::Ephemeral).unwrap();

        let first = cache.search("#").unwrap();
        prop_assert!(cache.store().is_empty());
        let second = cache.search("#").unwrap();
        prop_assert!(cache.store().is_empty());
        prop_assert_eq!(first, second);
    }
}
