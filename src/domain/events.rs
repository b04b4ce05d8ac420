//! Lifecycle Events
//!
//! Host signals that the world the cache mirrors has changed. The host
//! publishes them; [`crate::cache::SimCache::handle_event`] consumes them.
//!
//! # Example
//!
//! ```ignore
//! cache.handle_event(&LifecycleEvent::world_loaded("lot-42"))?;
//! // ... queries ...
//! cache.handle_event(&LifecycleEvent::world_teardown("lot-42"))?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LifecycleEvent {
    /// A world (zone, lot, save) finished loading or changed.
    WorldLoaded {
        world: String,
        timestamp: DateTime<Utc>,
    },

    /// The current world is being torn down.
    WorldTeardown {
        world: String,
        timestamp: DateTime<Utc>,
    },
}

impl LifecycleEvent {
    pub fn world_loaded(world: impl Into<String>) -> Self {
        LifecycleEvent::WorldLoaded {
            world: world.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn world_teardown(world: impl Into<String>) -> Self {
        LifecycleEvent::WorldTeardown {
            world: world.into(),
            timestamp: Utc::now(),
        }
    }

    /// Event type name, matching the serialized `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            LifecycleEvent::WorldLoaded { .. } => "WorldLoaded",
            LifecycleEvent::WorldTeardown { .. } => "WorldTeardown",
        }
    }

    pub fn world(&self) -> &str {
        match self {
            LifecycleEvent::WorldLoaded { world, .. }
            | LifecycleEvent::WorldTeardown { world, .. } => world,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LifecycleEvent::WorldLoaded { timestamp, .. }
            | LifecycleEvent::WorldTeardown { timestamp, .. } => *timestamp,
        }
    }
}
