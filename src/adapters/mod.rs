//! Host Adapters
//!
//! Implementations of the domain ports ([`crate::domain::ports`]) that do
//! not need a live host: roster files and in-memory fixtures.
//!
//! # Usage
//!
//! ```no_run
//! use simcache::adapters::RosterFileSource;
//! use simcache::cache::SimCache;
//!
//! # fn example() -> simcache::Result<()> {
//! let cache = SimCache::new(RosterFileSource::new("roster.yaml"));
//! cache.refresh(false)?;
//! let goths = cache.search("#goth")?;
//! # Ok(())
//! # }
//! ```

mod roster;

pub use roster::{InMemoryEntitySource, Roster, RosterEntity, RosterFileSource};
