//! Classification Tags
//!
//! Closed sets of tags used as secondary index keys. Each tag has a stable
//! ordinal (its position in `ALL`) that addresses its index slot, and keeps
//! the bit-flag value the host historically exchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Age bracket of an entity (single-valued per record)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgeBracket {
    Baby,
    Infant,
    Toddler,
    Child,
    Teen,
    #[serde(alias = "YOUNGADULT")]
    YoungAdult,
    Adult,
    Elder,
}

impl AgeBracket {
    /// Number of age brackets
    pub const COUNT: usize = 8;

    /// All brackets in ordinal order
    pub const ALL: [AgeBracket; Self::COUNT] = [
        AgeBracket::Baby,
        AgeBracket::Infant,
        AgeBracket::Toddler,
        AgeBracket::Child,
        AgeBracket::Teen,
        AgeBracket::YoungAdult,
        AgeBracket::Adult,
        AgeBracket::Elder,
    ];

    /// Stable index slot
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Bit-flag value (`BABY = 1` .. `ELDER = 128`)
    #[inline]
    pub fn flag(self) -> u32 {
        1 << self.ordinal()
    }

    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            AgeBracket::Baby => "BABY",
            AgeBracket::Infant => "INFANT",
            AgeBracket::Toddler => "TODDLER",
            AgeBracket::Child => "CHILD",
            AgeBracket::Teen => "TEEN",
            AgeBracket::YoungAdult => "YOUNG_ADULT",
            AgeBracket::Adult => "ADULT",
            AgeBracket::Elder => "ELDER",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeBracket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "YOUNGADULT" => return Ok(AgeBracket::YoungAdult),
            // Host enums print as `Age.TEEN`
            n if n.starts_with("AGE.") => return n[4..].parse(),
            _ => {}
        }
        AgeBracket::ALL
            .into_iter()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| Error::UnknownAgeBracket(s.to_string()))
    }
}

/// Occult/kind classification (multi-valued per record)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Human,
    Vampire,
    Alien,
    Mermaid,
    Witch,
    Werewolf,
    Ghost,
    Robot,
    Scarecrow,
    Skeleton,
    #[serde(alias = "PLANTSIM")]
    PlantSim,
}

impl Kind {
    /// Number of kinds
    pub const COUNT: usize = 11;

    /// All kinds in ordinal order
    pub const ALL: [Kind; Self::COUNT] = [
        Kind::Human,
        Kind::Vampire,
        Kind::Alien,
        Kind::Mermaid,
        Kind::Witch,
        Kind::Werewolf,
        Kind::Ghost,
        Kind::Robot,
        Kind::Scarecrow,
        Kind::Skeleton,
        Kind::PlantSim,
    ];

    /// Kinds the host reports through its occult-type query
    pub const BASE: [Kind; 6] = [
        Kind::Human,
        Kind::Vampire,
        Kind::Alien,
        Kind::Mermaid,
        Kind::Witch,
        Kind::Werewolf,
    ];

    /// Stable index slot
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Bit-flag value. Base kinds start at `1 << 10`, extended kinds at
    /// `1 << 19`, leaving room for future base kinds in between.
    pub fn flag(self) -> u32 {
        if self.is_base() {
            1 << (10 + self.ordinal())
        } else {
            1 << (19 + self.ordinal() - Kind::BASE.len())
        }
    }

    /// Whether the host reports this kind as a native occult type
    pub fn is_base(self) -> bool {
        self.ordinal() < Kind::BASE.len()
    }

    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Human => "HUMAN",
            Kind::Vampire => "VAMPIRE",
            Kind::Alien => "ALIEN",
            Kind::Mermaid => "MERMAID",
            Kind::Witch => "WITCH",
            Kind::Werewolf => "WEREWOLF",
            Kind::Ghost => "GHOST",
            Kind::Robot => "ROBOT",
            Kind::Scarecrow => "SCARECROW",
            Kind::Skeleton => "SKELETON",
            Kind::PlantSim => "PLANT_SIM",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        if normalized == "PLANTSIM" {
            return Ok(Kind::PlantSim);
        }
        Kind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// Gender tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Female,
    Male,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "FEMALE"),
            Gender::Male => write!(f, "MALE"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
