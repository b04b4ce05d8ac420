//! Domain Ports (Port/Adapter Pattern)
//!
//! The cache only talks to its host through these traits. Adapters in
//! [`crate::adapters`] implement them for roster files and in-memory
//! fixtures; a game or simulation host implements them for its own
//! entity objects.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Cache                                │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │                    Ports (Traits)                    │    │
//! │  │          EntitySource  │  EntityHandle               │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Host / Adapters                          │
//! │     RosterFileSource │ InMemoryEntitySource │ game host      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use crate::cache::{AgeBracket, EntityId, Kind};
use crate::error::Result;

// =============================================================================
// Entity Handle Port
// =============================================================================

/// Read-only view of one host entity.
///
/// Every attribute query may fail independently; the populate pass decides
/// how to degrade.
pub trait EntityHandle {
    /// Numeric identifier. `None` or `Some(0)` means unresolvable.
    fn id(&self) -> Option<EntityId>;

    /// First name.
    fn first_name(&self) -> Result<String>;

    /// Last name.
    fn last_name(&self) -> Result<String>;

    fn is_female(&self) -> bool;

    fn is_male(&self) -> bool;

    /// Single age bracket.
    fn age_bracket(&self) -> Result<AgeBracket>;

    /// Host-native occult query. Only asked about [`Kind::BASE`] kinds.
    fn has_occult_type(&self, kind: Kind) -> bool;

    fn is_ghost(&self) -> bool;

    fn is_robot(&self) -> bool;

    fn is_scarecrow(&self) -> bool;

    fn is_skeleton(&self) -> bool;

    fn is_plant_sim(&self) -> bool;

    fn is_witch(&self) -> bool;

    /// Route a kind to the predicate that answers it.
    ///
    /// Each extended kind has its own predicate, and `Witch` is reported by
    /// either the occult query or the dedicated witch check.
    fn has_kind(&self, kind: Kind) -> bool {
        match kind {
            Kind::Ghost => self.is_ghost(),
            Kind::Robot => self.is_robot(),
            Kind::Scarecrow => self.is_scarecrow(),
            Kind::Skeleton => self.is_skeleton(),
            Kind::PlantSim => self.is_plant_sim(),
            Kind::Witch => self.has_occult_type(Kind::Witch) || self.is_witch(),
            base => self.has_occult_type(base),
        }
    }
}

// =============================================================================
// Entity Source Port
// =============================================================================

/// Enumerates every entity the host currently knows about.
pub trait EntitySource: Send + Sync {
    type Handle: EntityHandle;

    /// One-shot, finite enumeration. An error here aborts the populate pass.
    fn entities(&self) -> Result<Vec<Self::Handle>>;
}

impl<S: EntitySource + ?Sized> EntitySource for Arc<S> {
    type Handle = S::Handle;

    fn entities(&self) -> Result<Vec<Self::Handle>> {
        (**self).entities()
    }
}
