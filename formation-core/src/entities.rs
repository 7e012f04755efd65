//! Entity records and their editable drafts.
//!
//! Records mirror what the API returns; drafts mirror what the edit forms
//! send. Records are never built client-side from a draft: the API's response
//! is the only source of a record (and of its id).

use crate::enums::{EntityKind, Profile, Role, Structure, TrainerStyle};
use crate::error::ValidationError;
use crate::identity::EntityId;
use crate::schema::{EntitySchema, FieldKind, FieldSpec, FieldValue};
use chrono::Datelike;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Whether a form is creating a new record or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// A record managed by one CRUD screen.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft: EntityDraft;

    fn schema() -> &'static EntitySchema;

    fn kind() -> EntityKind {
        Self::schema().kind
    }

    fn id(&self) -> &EntityId;

    /// Read a field by its wire name. Unknown names read as `Null`.
    fn field(&self, name: &str) -> FieldValue<'_>;

    /// Pre-populate an edit form. Write-only fields are left blank.
    fn to_draft(&self) -> Self::Draft;

    /// Short human label, used in activity feeds and confirmations.
    fn display_name(&self) -> String;
}

/// User-edited field values prior to server confirmation.
pub trait EntityDraft: Clone + fmt::Debug + Default + Serialize + Send + Sync + 'static {
    fn validate(&self, mode: FormMode) -> Result<(), ValidationError>;
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing { field });
    }
    Ok(())
}

fn require<T>(field: &'static str, value: &Option<T>) -> Result<(), ValidationError> {
    if value.is_none() {
        return Err(ValidationError::RequiredFieldMissing { field });
    }
    Ok(())
}

fn optional_int(value: Option<i64>) -> FieldValue<'static> {
    value.map(FieldValue::Integer).unwrap_or(FieldValue::Null)
}

// ============================================================================
// USER
// ============================================================================

/// Console account. The password is write-only and never held here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub login: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDraft {
    pub login: String,
    /// Left empty on edit to keep the current password.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub role: Option<Role>,
}

static USER_FIELDS: [FieldSpec; 2] = [
    FieldSpec::new("login", FieldKind::Text),
    FieldSpec::new("role", FieldKind::Enum),
];

static USER_SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Users,
    fields: &USER_FIELDS,
    search_fields: &["login", "role"],
    default_sort: "login",
};

impl Entity for User {
    type Draft = UserDraft;

    fn schema() -> &'static EntitySchema {
        &USER_SCHEMA
    }

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "login" => FieldValue::Text(&self.login),
            "role" => FieldValue::Text(self.role.as_str()),
            _ => FieldValue::Null,
        }
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            login: self.login.clone(),
            password: String::new(),
            role: Some(self.role),
        }
    }

    fn display_name(&self) -> String {
        self.login.clone()
    }
}

impl EntityDraft for UserDraft {
    fn validate(&self, mode: FormMode) -> Result<(), ValidationError> {
        require_text("login", &self.login)?;
        if mode == FormMode::Create {
            require_text("password", &self.password)?;
        }
        require("role", &self.role)
    }
}

// ============================================================================
// TRAINING
// ============================================================================

pub const MIN_DURATION_DAYS: i64 = 1;
pub const MAX_DURATION_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    pub id: EntityId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default)]
    pub year: Option<i64>,
    /// Length in days.
    #[serde(default)]
    pub duration: Option<i64>,
    /// Free-form category; the filter catalogue is built from observed values.
    #[serde(default, deserialize_with = "nullable_string")]
    pub field: String,
    #[serde(default)]
    pub budget: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDraft {
    pub title: String,
    pub year: Option<i64>,
    pub duration: Option<i64>,
    pub field: String,
    pub budget: Option<i64>,
}

impl Default for TrainingDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            year: Some(i64::from(chrono::Utc::now().year())),
            duration: Some(MIN_DURATION_DAYS),
            field: String::new(),
            budget: None,
        }
    }
}

static TRAINING_FIELDS: [FieldSpec; 5] = [
    FieldSpec::new("title", FieldKind::Text),
    FieldSpec::new("year", FieldKind::Integer),
    FieldSpec::new("duration", FieldKind::Integer),
    FieldSpec::new("field", FieldKind::Enum),
    FieldSpec::new("budget", FieldKind::Integer),
];

static TRAINING_SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Trainings,
    fields: &TRAINING_FIELDS,
    search_fields: &["title", "field"],
    default_sort: "title",
};

impl Entity for Training {
    type Draft = TrainingDraft;

    fn schema() -> &'static EntitySchema {
        &TRAINING_SCHEMA
    }

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "title" => FieldValue::Text(&self.title),
            "year" => optional_int(self.year),
            "duration" => optional_int(self.duration),
            "field" => FieldValue::Text(&self.field),
            "budget" => optional_int(self.budget),
            _ => FieldValue::Null,
        }
    }

    fn to_draft(&self) -> TrainingDraft {
        TrainingDraft {
            title: self.title.clone(),
            year: self.year,
            duration: self.duration,
            field: self.field.clone(),
            budget: self.budget,
        }
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }
}

impl EntityDraft for TrainingDraft {
    fn validate(&self, _mode: FormMode) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require("year", &self.year)?;
        require("duration", &self.duration)?;
        if let Some(duration) = self.duration {
            if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&duration) {
                return Err(ValidationError::InvalidValue {
                    field: "duration",
                    reason: format!(
                        "must be between {} and {} days",
                        MIN_DURATION_DAYS, MAX_DURATION_DAYS
                    ),
                });
            }
        }
        require_text("field", &self.field)?;
        require("budget", &self.budget)
    }
}

// ============================================================================
// TRAINER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub id: EntityId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tel: String,
    #[serde(default)]
    pub style: Option<TrainerStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub tel: String,
    pub style: TrainerStyle,
}

static TRAINER_FIELDS: [FieldSpec; 5] = [
    FieldSpec::new("firstName", FieldKind::Text),
    FieldSpec::new("lastName", FieldKind::Text),
    FieldSpec::new("email", FieldKind::Text),
    FieldSpec::new("tel", FieldKind::Text),
    FieldSpec::new("style", FieldKind::Enum),
];

static TRAINER_SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Trainers,
    fields: &TRAINER_FIELDS,
    search_fields: &["firstName", "lastName", "email", "tel", "style"],
    default_sort: "firstName",
};

impl Entity for Trainer {
    type Draft = TrainerDraft;

    fn schema() -> &'static EntitySchema {
        &TRAINER_SCHEMA
    }

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "firstName" => FieldValue::Text(&self.first_name),
            "lastName" => FieldValue::Text(&self.last_name),
            "email" => FieldValue::Text(&self.email),
            "tel" => FieldValue::Text(&self.tel),
            "style" => self.style.map(|s| s.as_str()).into(),
            _ => FieldValue::Null,
        }
    }

    fn to_draft(&self) -> TrainerDraft {
        TrainerDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            tel: self.tel.clone(),
            style: self.style.unwrap_or_default(),
        }
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl EntityDraft for TrainerDraft {
    fn validate(&self, _mode: FormMode) -> Result<(), ValidationError> {
        require_text("firstName", &self.first_name)?;
        require_text("lastName", &self.last_name)?;
        require_text("email", &self.email)?;
        require_text("tel", &self.tel)
    }
}

// ============================================================================
// PARTICIPANT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: EntityId,
    #[serde(default, deserialize_with = "nullable_string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub last_name: String,
    #[serde(default)]
    pub structure: Option<Structure>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDraft {
    pub first_name: String,
    pub last_name: String,
    pub structure: Option<Structure>,
    pub profile: Option<Profile>,
    pub email: String,
    pub tel: String,
}

static PARTICIPANT_FIELDS: [FieldSpec; 6] = [
    FieldSpec::new("firstName", FieldKind::Text),
    FieldSpec::new("lastName", FieldKind::Text),
    FieldSpec::new("structure", FieldKind::Enum),
    FieldSpec::new("profile", FieldKind::Enum),
    FieldSpec::new("email", FieldKind::Text),
    FieldSpec::new("tel", FieldKind::Text),
];

static PARTICIPANT_SCHEMA: EntitySchema = EntitySchema {
    kind: EntityKind::Participants,
    fields: &PARTICIPANT_FIELDS,
    search_fields: &["firstName", "lastName", "structure", "profile", "email", "tel"],
    default_sort: "firstName",
};

impl Entity for Participant {
    type Draft = ParticipantDraft;

    fn schema() -> &'static EntitySchema {
        &PARTICIPANT_SCHEMA
    }

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "firstName" => FieldValue::Text(&self.first_name),
            "lastName" => FieldValue::Text(&self.last_name),
            "structure" => self.structure.map(|s| s.as_str()).into(),
            "profile" => self.profile.map(|p| p.as_str()).into(),
            "email" => FieldValue::Text(&self.email),
            "tel" => FieldValue::Text(&self.tel),
            _ => FieldValue::Null,
        }
    }

    fn to_draft(&self) -> ParticipantDraft {
        ParticipantDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            structure: self.structure,
            profile: self.profile,
            email: self.email.clone(),
            tel: self.tel.clone(),
        }
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl EntityDraft for ParticipantDraft {
    fn validate(&self, _mode: FormMode) -> Result<(), ValidationError> {
        require_text("firstName", &self.first_name)?;
        require_text("lastName", &self.last_name)?;
        require("structure", &self.structure)?;
        require("profile", &self.profile)?;
        require_text("email", &self.email)?;
        require_text("tel", &self.tel)
    }
}
