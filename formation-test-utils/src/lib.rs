//! Formation Test Utilities
//!
//! Shared test infrastructure for the formation workspace:
//! - Proptest generators for records and enums
//! - In-memory doubles for the API traits and scoped storage
//! - Fixtures for common scenarios
//! - Assertions for console results

pub use formation_client::{ApiClientError, MemoryStorage, ScopedStorage, StorageError};
pub use formation_core::{
    ActivityRecord, Credentials, Entity, EntityId, EntityKind, Identity, Participant, Profile,
    Role, Structure, Timestamp, Trainer, TrainerStyle, Training, User,
};

use async_trait::async_trait;
use formation_client::{ActivityApi, AuthApi, EntityApi};
use std::collections::HashMap;
use std::sync::RwLock;

// ============================================================================
// MOCK API
// ============================================================================

/// A request received by [`MockEntityApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List,
    Create,
    Update(EntityId),
    Delete(EntityId),
}

type CallHook = Box<dyn Fn(&ApiCall) + Send + Sync>;

/// In-memory stand-in for one entity collection of the REST API.
///
/// Ids are assigned sequentially from 1. Records are materialised from
/// drafts through their JSON form, the same way the server echoes them.
pub struct MockEntityApi<E: Entity> {
    records: RwLock<Vec<E>>,
    next_id: RwLock<i64>,
    calls: RwLock<Vec<ApiCall>>,
    failure: RwLock<Option<(u16, String)>>,
    hook: RwLock<Option<CallHook>>,
}

impl<E: Entity> Default for MockEntityApi<E> {
    fn default() -> Self {
        Self::with_records(Vec::new())
    }
}

impl<E: Entity> MockEntityApi<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the collection. New ids continue after the highest integer id.
    pub fn with_records(records: Vec<E>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| match r.id() {
                EntityId::Int(id) => Some(*id),
                EntityId::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            records: RwLock::new(records),
            next_id: RwLock::new(next_id),
            calls: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
            hook: RwLock::new(None),
        }
    }

    /// Make every call fail with this status until [`Self::recover`].
    pub fn fail_with(&self, status: u16, message: impl Into<String>) {
        *self.failure.write().unwrap() = Some((status, message.into()));
    }

    pub fn recover(&self) {
        *self.failure.write().unwrap() = None;
    }

    /// Run `hook` while each request is being served.
    pub fn on_call(&self, hook: impl Fn(&ApiCall) + Send + Sync + 'static) {
        *self.hook.write().unwrap() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn records(&self) -> Vec<E> {
        self.records.read().unwrap().clone()
    }

    fn begin(&self, call: ApiCall) -> Result<(), ApiClientError> {
        if let Some(hook) = self.hook.read().unwrap().as_ref() {
            hook(&call);
        }
        self.calls.write().unwrap().push(call);
        match self.failure.read().unwrap().as_ref() {
            Some((status, message)) => Err(ApiClientError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn materialise(id: &EntityId, draft: &E::Draft) -> Result<E, ApiClientError> {
        let mut value = serde_json::to_value(draft)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("id".to_string(), serde_json::to_value(id)?);
        }
        Ok(serde_json::from_value(value)?)
    }

    fn not_found(id: &EntityId) -> ApiClientError {
        ApiClientError::Status {
            status: 404,
            message: format!("{} {} not found", E::kind().singular(), id),
        }
    }
}

#[async_trait]
impl<E: Entity> EntityApi<E> for MockEntityApi<E> {
    async fn list(&self) -> Result<Vec<E>, ApiClientError> {
        self.begin(ApiCall::List)?;
        Ok(self.records())
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, ApiClientError> {
        self.begin(ApiCall::Create)?;
        let id = {
            let mut next = self.next_id.write().unwrap();
            let id = EntityId::Int(*next);
            *next += 1;
            id
        };
        let created = Self::materialise(&id, draft)?;
        self.records.write().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &EntityId, draft: &E::Draft) -> Result<E, ApiClientError> {
        self.begin(ApiCall::Update(id.clone()))?;
        let updated = Self::materialise(id, draft)?;
        let mut records = self.records.write().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiClientError> {
        self.begin(ApiCall::Delete(id.clone()))?;
        self.records.write().unwrap().retain(|r| r.id() != id);
        Ok(())
    }
}

/// Authentication endpoint accepting a fixed set of accounts.
#[derive(Default)]
pub struct MockAuthApi {
    accounts: RwLock<HashMap<String, (String, Identity)>>,
    rejection: RwLock<Option<ApiClientError>>,
}

impl MockAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, login: &str, password: &str, role: Role) -> Self {
        self.accounts.write().unwrap().insert(
            login.to_string(),
            (password.to_string(), Identity::new(login, role)),
        );
        self
    }

    /// Answer the next failed attempt with this error instead of a 401.
    pub fn reject_with(&self, error: ApiClientError) {
        *self.rejection.write().unwrap() = Some(error);
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, ApiClientError> {
        let accounts = self.accounts.read().unwrap();
        match accounts.get(&credentials.login) {
            Some((password, identity)) if *password == credentials.password => {
                Ok(identity.clone())
            }
            _ => match self.rejection.write().unwrap().take() {
                Some(error) => Err(error),
                None => Err(ApiClientError::Status {
                    status: 401,
                    message: "Bad credentials".to_string(),
                }),
            },
        }
    }
}

/// Activity feeds keyed by entity; kinds marked failing answer with a 500.
#[derive(Default)]
pub struct MockActivityApi {
    feeds: RwLock<HashMap<EntityKind, Vec<ActivityRecord>>>,
    failing: RwLock<Vec<EntityKind>>,
    requested: RwLock<Vec<EntityKind>>,
}

impl MockActivityApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, kind: EntityKind, records: Vec<ActivityRecord>) -> Self {
        self.feeds.write().unwrap().insert(kind, records);
        self
    }

    pub fn failing(self, kind: EntityKind) -> Self {
        self.failing.write().unwrap().push(kind);
        self
    }

    pub fn requested(&self) -> Vec<EntityKind> {
        self.requested.read().unwrap().clone()
    }
}

#[async_trait]
impl ActivityApi for MockActivityApi {
    async fn recent_activities(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<ActivityRecord>, ApiClientError> {
        self.requested.write().unwrap().push(kind);
        if self.failing.read().unwrap().contains(&kind) {
            return Err(ApiClientError::UnexpectedStatus {
                status: 500,
                body: "feed unavailable".to_string(),
            });
        }
        Ok(self
            .feeds
            .read()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }
}

/// Scoped storage whose writes always fail; reads see nothing.
#[derive(Debug, Default)]
pub struct ReadOnlyStorage;

impl ScopedStorage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "storage is read-only",
        )))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for formation records.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::User), Just(Role::Manager), Just(Role::Admin)]
    }

    pub fn arb_trainer_style() -> impl Strategy<Value = TrainerStyle> {
        prop_oneof![Just(TrainerStyle::Interne), Just(TrainerStyle::Externe)]
    }

    pub fn arb_structure() -> impl Strategy<Value = Structure> {
        prop::sample::select(Structure::all().to_vec())
    }

    pub fn arb_profile() -> impl Strategy<Value = Profile> {
        prop::sample::select(Profile::all().to_vec())
    }

    /// Short names mixing case and a few accented letters.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-zéèÉà]{1,10}"
    }

    pub fn arb_entity_id() -> impl Strategy<Value = EntityId> {
        prop_oneof![
            (1i64..10_000).prop_map(EntityId::Int),
            "[a-z0-9]{4,12}".prop_map(EntityId::Text),
        ]
    }

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(chrono::Utc::now)
        })
    }

    pub fn arb_user(id: i64) -> impl Strategy<Value = User> {
        (arb_name(), arb_role()).prop_map(move |(login, role)| User {
            id: EntityId::Int(id),
            login,
            role,
        })
    }

    pub fn arb_training(id: i64) -> impl Strategy<Value = Training> {
        (
            arb_name(),
            prop::option::of(2015i64..2030),
            prop::option::of(1i64..=365),
            prop::sample::select(vec!["IT", "Management", "Finance", "Langues"]),
            prop::option::of(0i64..100_000),
        )
            .prop_map(move |(title, year, duration, field, budget)| Training {
                id: EntityId::Int(id),
                title,
                year,
                duration,
                field: field.to_string(),
                budget,
            })
    }

    pub fn arb_trainer(id: i64) -> impl Strategy<Value = Trainer> {
        (
            arb_name(),
            arb_name(),
            prop::option::of(arb_trainer_style()),
        )
            .prop_map(move |(first_name, last_name, style)| Trainer {
                id: EntityId::Int(id),
                email: format!("{}@example.org", first_name.to_lowercase()),
                tel: format!("06{:08}", id),
                first_name,
                last_name,
                style,
            })
    }

    pub fn arb_participant(id: i64) -> impl Strategy<Value = Participant> {
        (
            arb_name(),
            arb_name(),
            prop::option::of(arb_structure()),
            prop::option::of(arb_profile()),
        )
            .prop_map(move |(first_name, last_name, structure, profile)| Participant {
                id: EntityId::Int(id),
                email: format!("{}@example.org", first_name.to_lowercase()),
                tel: format!("07{:08}", id),
                first_name,
                last_name,
                structure,
                profile,
            })
    }

    /// Lists with distinct sequential ids starting at 1.
    pub fn arb_users(max: usize) -> impl Strategy<Value = Vec<User>> {
        prop::collection::vec((arb_name(), arb_role()), 0..max).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (login, role))| User {
                    id: EntityId::Int(i as i64 + 1),
                    login,
                    role,
                })
                .collect()
        })
    }

    pub fn arb_trainings(max: usize) -> impl Strategy<Value = Vec<Training>> {
        (0..max).prop_flat_map(|len| {
            (1..=len as i64)
                .map(arb_training)
                .collect::<Vec<_>>()
        })
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Fixed records for scenario tests.

    use super::*;

    pub fn user(id: i64, login: &str, role: Role) -> User {
        User {
            id: EntityId::Int(id),
            login: login.to_string(),
            role,
        }
    }

    /// `bob` (user) then `ann` (admin).
    pub fn bob_and_ann() -> Vec<User> {
        vec![user(1, "bob", Role::User), user(2, "ann", Role::Admin)]
    }

    pub fn training(id: i64, title: &str, year: i64, field: &str, budget: i64) -> Training {
        Training {
            id: EntityId::Int(id),
            title: title.to_string(),
            year: Some(year),
            duration: Some(3),
            field: field.to_string(),
            budget: Some(budget),
        }
    }

    pub fn trainings() -> Vec<Training> {
        vec![
            training(1, "Rust avancé", 2024, "IT", 12_000),
            training(2, "Écriture managériale", 2023, "Management", 4_500),
            training(3, "anglais", 2024, "Langues", 3_000),
            training(4, "Comptabilité", 2025, "Finance", 8_000),
        ]
    }

    pub fn trainer(id: i64, first: &str, last: &str, style: TrainerStyle) -> Trainer {
        Trainer {
            id: EntityId::Int(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.org", first.to_lowercase()),
            tel: "0600000000".to_string(),
            style: Some(style),
        }
    }

    pub fn participant(id: i64, first: &str, last: &str, profile: Profile) -> Participant {
        Participant {
            id: EntityId::Int(id),
            first_name: first.to_string(),
            last_name: last.to_string(),
            structure: Some(Structure::DirectionCentral),
            profile: Some(profile),
            email: format!("{}@example.org", first.to_lowercase()),
            tel: "0700000000".to_string(),
        }
    }

    /// Activity record with the given extra fields.
    pub fn activity(id: i64, updated_at: Timestamp, fields: serde_json::Value) -> ActivityRecord {
        let fields = match fields {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        ActivityRecord {
            id: EntityId::Int(id),
            updated_at,
            fields,
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over record lists.

    use super::*;

    /// Assert the logins of `rows`, in order.
    #[track_caller]
    pub fn assert_logins(rows: &[&User], expected: &[&str]) {
        let logins: Vec<&str> = rows.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, expected, "unexpected row order");
    }

    /// Assert every id in `rows` is unique.
    #[track_caller]
    pub fn assert_unique_ids<E: Entity>(rows: &[E]) {
        for (i, row) in rows.iter().enumerate() {
            assert!(
                rows[i + 1..].iter().all(|other| other.id() != row.id()),
                "duplicate id {}",
                row.id()
            );
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use formation_core::{TrainingDraft, UserDraft};
    use proptest::prelude::*;

    #[tokio::test]
    async fn mock_assigns_sequential_ids() {
        let api = MockEntityApi::with_records(fixtures::bob_and_ann());
        let draft = UserDraft {
            login: "carl".to_string(),
            password: "pw".to_string(),
            role: Some(Role::Manager),
        };
        let created = EntityApi::<User>::create(&api, &draft).await.unwrap();
        assert_eq!(created.id, EntityId::Int(3));
        assert_eq!(created.role, Role::Manager);
        assertions::assert_unique_ids(&api.records());
    }

    #[tokio::test]
    async fn mock_update_of_unknown_id_is_404() {
        let api: MockEntityApi<Training> = MockEntityApi::with_records(fixtures::trainings());
        let draft = TrainingDraft {
            title: "X".to_string(),
            field: "IT".to_string(),
            budget: Some(1),
            ..TrainingDraft::default()
        };
        let err = api.update(&EntityId::Int(99), &draft).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(api.calls(), vec![ApiCall::Update(EntityId::Int(99))]);
    }

    #[tokio::test]
    async fn auth_mock_rejects_bad_password() {
        let auth = MockAuthApi::new().with_account("ann", "secret", Role::Admin);
        let ok = auth
            .authenticate(&Credentials::new("ann", "secret"))
            .await
            .unwrap();
        assert_eq!(ok.role, Role::Admin);
        let err = auth
            .authenticate(&Credentials::new("ann", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_generated_user_lists_have_unique_ids(users in generators::arb_users(20)) {
            assertions::assert_unique_ids(&users);
        }

        #[test]
        fn prop_generated_trainings_have_valid_duration(trainings in generators::arb_trainings(10)) {
            for training in &trainings {
                if let Some(duration) = training.duration {
                    prop_assert!((1..=365).contains(&duration));
                }
            }
        }
    }
}
