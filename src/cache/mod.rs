//! Multi-Index Entity Cache
//!
//! In-memory cache of entity records keyed by id, with secondary indexes by
//! gender, age bracket and kind, and a tiered fuzzy search over names.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                        SimCache (lifecycle)                              │
//! │            resident / ephemeral mode, world load/teardown hooks          │
//! ├──────────────────────────────────────────────────────────────────────────┤
//! │  Populate Engine        │ Index Store               │ Query Engine        │
//! │  ┌──────────────────┐   │ ┌─────────────────────┐   │ ┌────────────────┐  │
//! │  │ EntitySource     │──▶│ │ id → EntityRecord   │──▶│ │ by_ids/kinds/  │  │
//! │  │ one pass, per-   │   │ │ name → id           │   │ │ ages/gender    │  │
//! │  │ entity isolation │   │ │ gender/age/kind     │   │ │ tiered by_name │  │
//! │  └──────────────────┘   │ │   → {id: name}      │   │ └────────────────┘  │
//! │                         │ └─────────────────────┘   │                     │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers always get copies or immutable `Arc` snapshots. A populate pass
//! builds the next index set off to the side and commits it in one write.

mod classification;
mod entry;
mod manager;
mod metrics;
mod populate;
#[cfg(test)]
mod proptest;
mod query;
mod search;
mod store;

pub use classification::{AgeBracket, Gender, Kind};
pub use entry::{compose_name, missing_placeholder, split_name, EntityId, EntityRecord, IdNameMap};
pub use manager::{CacheConfig, CacheStats, MemoryMode, SimCache};
pub use metrics::{CacheMetrics, MetricsSnapshot};
pub use populate::PopulateReport;
pub use search::{MatchTier, NameMatches, NameQuery};
pub use store::{CacheSnapshot, IndexSet, IndexStore};

/// Separator between first and last name
pub const NAME_SEPARATOR: char = '#';

/// Name stored when the host cannot resolve one
pub const UNKNOWN_NAME: &str = "unknown firstname#unknown lastname";
