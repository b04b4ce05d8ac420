//! Roster Adapters
//!
//! Implement the entity ports on plain serde records, either held in
//! memory or loaded from a JSON/YAML roster file.
//!
//! # Roster file format
//!
//! ```yaml
//! entities:
//!   - id: 1
//!     first_name: Bella
//!     last_name: Goth
//!     gender: FEMALE
//!     age: ADULT
//!     kinds: [HUMAN]
//!   - id: 2
//!     first_name: Servo
//!     last_name: Unit
//!     robot: true
//! ```
//!
//! A missing `id`, name or `age` models a host lookup that fails.

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{AgeBracket, EntityId, Gender, Kind};
use crate::domain::ports::{EntityHandle, EntitySource};
use crate::error::{Error, Result};

/// One host entity as described in a roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterEntity {
    pub id: Option<EntityId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    /// Raw age tag as the host reports it, e.g. `TEEN` or `Age.TEEN`
    pub age: Option<String>,
    /// Kinds reported by the occult query (extended kinds accepted too)
    pub kinds: Vec<Kind>,
    pub ghost: bool,
    pub robot: bool,
    pub scarecrow: bool,
    pub skeleton: bool,
    pub plant_sim: bool,
    pub witch: bool,
}

impl RosterEntity {
    pub fn new(id: EntityId, first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            first_name: Some(first.into()),
            last_name: Some(last.into()),
            ..Default::default()
        }
    }

    /// Entity whose id cannot be resolved
    pub fn without_id(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            id: None,
            ..Self::new(0, first, last)
        }
    }

    pub fn female(mut self) -> Self {
        self.gender = Some(Gender::Female);
        self
    }

    pub fn male(mut self) -> Self {
        self.gender = Some(Gender::Male);
        self
    }

    pub fn age(mut self, age: AgeBracket) -> Self {
        self.age = Some(age.to_string());
        self
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = Kind>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    pub fn ghost(mut self) -> Self {
        self.ghost = true;
        self
    }

    pub fn robot(mut self) -> Self {
        self.robot = true;
        self
    }

    pub fn scarecrow(mut self) -> Self {
        self.scarecrow = true;
        self
    }

    pub fn skeleton(mut self) -> Self {
        self.skeleton = true;
        self
    }

    pub fn plant_sim(mut self) -> Self {
        self.plant_sim = true;
        self
    }

    pub fn witch(mut self) -> Self {
        self.witch = true;
        self
    }

    fn listed(&self, kind: Kind) -> bool {
        self.kinds.contains(&kind)
    }
}

impl EntityHandle for RosterEntity {
    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn first_name(&self) -> Result<String> {
        self.first_name
            .clone()
            .ok_or_else(|| Error::Host("first name not set".into()))
    }

    fn last_name(&self) -> Result<String> {
        self.last_name
            .clone()
            .ok_or_else(|| Error::Host("last name not set".into()))
    }

    fn is_female(&self) -> bool {
        self.gender == Some(Gender::Female)
    }

    fn is_male(&self) -> bool {
        self.gender == Some(Gender::Male)
    }

    fn age_bracket(&self) -> Result<AgeBracket> {
        match &self.age {
            Some(tag) => tag.parse(),
            None => Err(Error::Host("age not set".into())),
        }
    }

    fn has_occult_type(&self, kind: Kind) -> bool {
        kind.is_base() && self.listed(kind)
    }

    fn is_ghost(&self) -> bool {
        self.ghost || self.listed(Kind::Ghost)
    }

    fn is_robot(&self) -> bool {
        self.robot || self.listed(Kind::Robot)
    }

    fn is_scarecrow(&self) -> bool {
        self.scarecrow || self.listed(Kind::Scarecrow)
    }

    fn is_skeleton(&self) -> bool {
        self.skeleton || self.listed(Kind::Skeleton)
    }

    fn is_plant_sim(&self) -> bool {
        self.plant_sim || self.listed(Kind::PlantSim)
    }

    fn is_witch(&self) -> bool {
        self.witch
    }
}

/// Top-level roster document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub entities: Vec<RosterEntity>,
}

impl Roster {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load a roster, choosing the format by extension (`.json`, `.yaml`,
    /// `.yml`)
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            other => Err(Error::Config(format!(
                "unsupported roster format {:?} for {}",
                other,
                path.display()
            ))),
        }
    }
}

// =============================================================================
// In-Memory Source
// =============================================================================

/// Mutable in-memory entity source.
///
/// Replacing its contents stands in for the host world changing.
#[derive(Debug, Default)]
pub struct InMemoryEntitySource {
    entities: RwLock<Vec<RosterEntity>>,
    fail_next: Mutex<Option<String>>,
}

impl InMemoryEntitySource {
    pub fn new(entities: Vec<RosterEntity>) -> Self {
        Self {
            entities: RwLock::new(entities),
            fail_next: Mutex::new(None),
        }
    }

    pub fn push(&self, entity: RosterEntity) {
        self.entities.write().push(entity);
    }

    pub fn replace(&self, entities: Vec<RosterEntity>) {
        *self.entities.write() = entities;
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Make the next enumeration fail with a host error
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.fail_next.lock() = Some(reason.into());
    }
}

impl From<Roster> for InMemoryEntitySource {
    fn from(roster: Roster) -> Self {
        Self::new(roster.entities)
    }
}

impl EntitySource for InMemoryEntitySource {
    type Handle = RosterEntity;

    fn entities(&self) -> Result<Vec<RosterEntity>> {
        if let Some(reason) = self.fail_next.lock().take() {
            return Err(Error::Host(reason));
        }
        Ok(self.entities.read().clone())
    }
}

// =============================================================================
// File Source
// =============================================================================

/// Entity source re-read from a roster file on every enumeration
#[derive(Debug, Clone)]
pub struct RosterFileSource {
    path: PathBuf,
}

impl RosterFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntitySource for RosterFileSource {
    type Handle = RosterEntity;

    fn entities(&self) -> Result<Vec<RosterEntity>> {
        let roster = Roster::load(&self.path)?;
        debug!(path = %self.path.display(), entities = roster.entities.len(), "Loaded roster");
        Ok(roster.entities)
    }
}
