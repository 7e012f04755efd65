//! Enum types for console entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ENTITY KIND
// ============================================================================

/// Entity type discriminator, one per managed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Users,
    Trainings,
    Trainers,
    Participants,
}

impl EntityKind {
    /// Collection segment under `/api/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Trainings => "trainings",
            EntityKind::Trainers => "trainers",
            EntityKind::Participants => "participants",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Users => "user",
            EntityKind::Trainings => "training",
            EntityKind::Trainers => "trainer",
            EntityKind::Participants => "participant",
        }
    }

    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Users,
            EntityKind::Trainings,
            EntityKind::Trainers,
            EntityKind::Participants,
        ]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Error when parsing a string that is not one of an enum's wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl EnumParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// ROLE
// ============================================================================

/// Authorization role carried by a user and by the session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "Regular User",
            Role::Manager => "Manager",
            Role::Admin => "Administrator",
        }
    }

    pub fn all() -> &'static [Role] {
        &[Role::User, Role::Manager, Role::Admin]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(EnumParseError::new("role", s)),
        }
    }
}

// ============================================================================
// TRAINER STYLE
// ============================================================================

/// Whether a trainer is staff or contracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainerStyle {
    #[default]
    Interne,
    Externe,
}

impl TrainerStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainerStyle::Interne => "interne",
            TrainerStyle::Externe => "externe",
        }
    }
}

impl fmt::Display for TrainerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrainerStyle {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interne" => Ok(TrainerStyle::Interne),
            "externe" => Ok(TrainerStyle::Externe),
            _ => Err(EnumParseError::new("trainer style", s)),
        }
    }
}

// ============================================================================
// PARTICIPANT STRUCTURE
// ============================================================================

/// Organisational structure a participant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Structure {
    #[serde(rename = "Direction regional")]
    DirectionRegional,
    #[serde(rename = "Direction central")]
    DirectionCentral,
}

impl Structure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Structure::DirectionRegional => "Direction regional",
            Structure::DirectionCentral => "Direction central",
        }
    }

    pub fn all() -> &'static [Structure] {
        &[Structure::DirectionRegional, Structure::DirectionCentral]
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Structure {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Direction regional" => Ok(Structure::DirectionRegional),
            "Direction central" => Ok(Structure::DirectionCentral),
            _ => Err(EnumParseError::new("structure", s)),
        }
    }
}

// ============================================================================
// PARTICIPANT PROFILE
// ============================================================================

/// Professional profile of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "Informaticien-bac-5")]
    InformaticienBac5,
    #[serde(rename = "Informaticien-bac-3")]
    InformaticienBac3,
    #[serde(rename = "Gestionnaire")]
    Gestionnaire,
    #[serde(rename = "Juriste")]
    Juriste,
    #[serde(rename = "Technicien-superieur")]
    TechnicienSuperieur,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::InformaticienBac5 => "Informaticien-bac-5",
            Profile::InformaticienBac3 => "Informaticien-bac-3",
            Profile::Gestionnaire => "Gestionnaire",
            Profile::Juriste => "Juriste",
            Profile::TechnicienSuperieur => "Technicien-superieur",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Profile::InformaticienBac5 => "Informaticien (bac + 5)",
            Profile::InformaticienBac3 => "Informaticien (bac + 3)",
            Profile::Gestionnaire => "Gestionnaire",
            Profile::Juriste => "Juriste",
            Profile::TechnicienSuperieur => "Technicien supérieur",
        }
    }

    pub fn all() -> &'static [Profile] {
        &[
            Profile::InformaticienBac5,
            Profile::InformaticienBac3,
            Profile::Gestionnaire,
            Profile::Juriste,
            Profile::TechnicienSuperieur,
        ]
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Profile {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::all()
            .iter()
            .copied()
            .find(|profile| profile.as_str() == s)
            .ok_or_else(|| EnumParseError::new("profile", s))
    }
}
