//! Formation Core - Entity Types, Filtering and Sorting
//!
//! Pure data structures and pure functions shared by every screen of the
//! training administration console. Nothing in this crate performs I/O.

pub mod activity;
pub mod entities;
pub mod enums;
pub mod error;
pub mod filter;
pub mod identity;
pub mod schema;
pub mod sort;

pub use activity::ActivityRecord;
pub use entities::{
    Entity, EntityDraft, FormMode, Participant, ParticipantDraft, Trainer, TrainerDraft, Training,
    TrainingDraft, User, UserDraft,
};
pub use enums::{EntityKind, EnumParseError, Profile, Role, Structure, TrainerStyle};
pub use error::{FilterError, IdentityParseError, ValidationError};
pub use filter::{
    distinct_values, field_matches, filter_rows, matches, matches_search, FilterSet, FilterSlot,
    FilterValue,
};
pub use identity::{Credentials, EntityId, Identity, Timestamp};
pub use schema::{EntitySchema, FieldKind, FieldSpec, FieldValue};
pub use sort::{collate, compare, compare_values, sort_rows, SortConfig, SortDirection};
