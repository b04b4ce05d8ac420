//! SimCache - Multi-Index Entity Cache
//!
//! An in-memory cache of host entities keyed by numeric id, with secondary
//! indexes on gender, age bracket and kind, and a four-tier fuzzy search
//! over `first#last` names.
//!
//! # Architecture
//!
//! ```text
//! Host (EntitySource) → Populate Engine → Index Store → Query Engine
//!         ▲                                    ▲
//!         └──── Lifecycle events ──── SimCache (resident / ephemeral)
//! ```
//!
//! # Example
//!
//! ```
//! use simcache::adapters::{InMemoryEntitySource, RosterEntity};
//! use simcache::cache::{AgeBracket, Kind, SimCache};
//!
//! # fn main() -> simcache::Result<()> {
//! let source = InMemoryEntitySource::new(vec![
//!     RosterEntity::new(1, "Bella", "Goth").female().age(AgeBracket::Adult).kinds([Kind::Human]),
//!     RosterEntity::new(2, "Bello", "Gothic").male().age(AgeBracket::Teen),
//! ]);
//! let cache = SimCache::new(source);
//! cache.refresh(false)?;
//!
//! let found = cache.search("bella#goth")?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`adapters`] - Roster file and in-memory entity sources
//! - [`cache`] - Index store, populate engine, queries and lifecycle
//! - [`domain`] - Host ports and lifecycle events
//! - [`error`] - Error types

pub mod adapters;
pub mod cache;
pub mod domain;
pub mod error;

// Re-export commonly used types
pub use cache::{
    AgeBracket, CacheConfig, EntityId, EntityRecord, Gender, IdNameMap, Kind, MemoryMode,
    NameMatches, SimCache,
};
pub use domain::{EntityHandle, EntitySource, LifecycleEvent};
pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
