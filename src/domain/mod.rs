//! Domain Layer
//!
//! - **Ports** (`ports.rs`) - traits the host implements to feed the cache
//! - **Events** (`events.rs`) - host lifecycle signals the cache reacts to
//!
//! # Usage
//!
//! ```ignore
//! use simcache::domain::{EntitySource, LifecycleEvent};
//!
//! fn rebuild<S: EntitySource>(cache: &SimCache<S>) -> Result<()> {
//!     cache.handle_event(&LifecycleEvent::world_loaded("home-lot"))
//! }
//! ```

pub mod events;
pub mod ports;

pub use events::LifecycleEvent;
pub use ports::{EntityHandle, EntitySource};
