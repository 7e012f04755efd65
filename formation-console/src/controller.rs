//! CRUD screen controller
//!
//! One controller drives one entity screen: it owns the entity store, the
//! open edit form, the pending delete confirmation, and the filter, search
//! and sort state that derive the visible rows.

use crate::error::{ConsoleError, ConsoleResult};
use crate::liveness::Liveness;
use crate::notifications::{Notification, NotificationAction, NotificationLevel, Notifications};
use crate::store::EntityStore;
use formation_client::EntityApi;
use formation_core::{
    distinct_values, filter_rows, sort_rows, Entity, EntityDraft, EntityId, FieldKind,
    FilterError, FilterSet, FilterValue, FormMode, SortConfig, SortDirection,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Lifecycle of a screen. While `Saving` or `Deleting` further mutations
/// are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Loading,
    Ready,
    Saving,
    Deleting,
}

impl ControllerState {
    fn busy_operation(self) -> Option<&'static str> {
        match self {
            ControllerState::Saving => Some("save"),
            ControllerState::Deleting => Some("delete"),
            ControllerState::Loading | ControllerState::Ready => None,
        }
    }
}

/// Open create or edit form.
#[derive(Debug, Clone)]
pub struct FormState<D> {
    pub mode: FormMode,
    /// Record being edited; `None` when creating.
    pub target: Option<EntityId>,
    pub draft: D,
    /// Message from the last failed submit, shown inline.
    pub error: Option<String>,
}

pub struct CrudController<E: Entity, A: EntityApi<E>> {
    store: EntityStore<E, A>,
    state: ControllerState,
    form: Option<FormState<E::Draft>>,
    pending_delete: Option<EntityId>,
    filters: FilterSet,
    search: String,
    sort: SortConfig,
    notifications: Notifications,
}

impl<E: Entity, A: EntityApi<E>> CrudController<E, A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            store: EntityStore::with_liveness(api, Liveness::new()),
            state: ControllerState::Loading,
            form: None,
            pending_delete: None,
            filters: FilterSet::new(),
            search: String::new(),
            sort: SortConfig::for_entity::<E>(),
            notifications: Notifications::new(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn store(&self) -> &EntityStore<E, A> {
        &self.store
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Handle for in-flight work to observe unmounting.
    pub fn liveness(&self) -> Liveness {
        self.store.liveness().clone()
    }

    pub fn unmount(&self) {
        debug!(entity = %E::kind(), "screen unmounted");
        self.store.liveness().unmount();
    }

    fn ensure_idle(&self) -> ConsoleResult<()> {
        match self.state.busy_operation() {
            Some(operation) => Err(ConsoleError::Busy { operation }),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fetch the list. A failure is surfaced as a notification and leaves
    /// the screen usable with an empty list.
    pub async fn load(&mut self) -> ConsoleResult<usize> {
        self.ensure_idle()?;
        self.state = ControllerState::Loading;
        match self.store.load().await {
            Ok(count) => {
                self.state = ControllerState::Ready;
                Ok(count)
            }
            Err(ConsoleError::Unmounted) => Err(ConsoleError::Unmounted),
            Err(e) => {
                self.state = ControllerState::Ready;
                self.notifications.push(
                    Notification::new(
                        NotificationLevel::Error,
                        format!("Failed to load {}: {}", E::kind(), e),
                    )
                    .with_action(NotificationAction::Retry),
                );
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Form
    // ------------------------------------------------------------------

    pub fn form(&self) -> Option<&FormState<E::Draft>> {
        self.form.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut E::Draft> {
        self.form.as_mut().map(|form| &mut form.draft)
    }

    /// Open an empty form with the entity's defaults.
    pub fn start_create(&mut self) {
        self.form = Some(FormState {
            mode: FormMode::Create,
            target: None,
            draft: E::Draft::default(),
            error: None,
        });
    }

    /// Open a form pre-populated from the record with this id.
    pub fn start_edit(&mut self, id: &EntityId) -> ConsoleResult<()> {
        let entity = self.store.get(id).ok_or_else(|| ConsoleError::NotFound {
            kind: E::kind(),
            id: id.clone(),
        })?;
        self.form = Some(FormState {
            mode: FormMode::Edit,
            target: Some(id.clone()),
            draft: entity.to_draft(),
            error: None,
        });
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Whether the submit action is currently enabled.
    pub fn can_submit(&self) -> bool {
        self.form.is_some() && self.state == ControllerState::Ready
    }

    /// Validate and send the open form with `draft` as its content.
    ///
    /// On success the form closes and the server's id is returned. On
    /// failure the form stays open with its error set.
    pub async fn submit(&mut self, draft: E::Draft) -> ConsoleResult<EntityId> {
        self.ensure_idle()?;
        let form = self.form.as_mut().ok_or(ConsoleError::NoOpenForm)?;
        form.draft = draft.clone();
        form.error = None;
        let mode = form.mode;
        let target = form.target.clone();

        if let Err(e) = draft.validate(mode) {
            self.fail_form(e.to_string());
            return Err(e.into());
        }

        self.state = ControllerState::Saving;
        let result = match &target {
            Some(id) => self.store.update(id, &draft).await.map(|e| e.id().clone()),
            None => self.store.create(&draft).await.map(|e| e.id().clone()),
        };
        if matches!(result, Err(ConsoleError::Unmounted)) {
            return result;
        }
        self.state = ControllerState::Ready;

        match result {
            Ok(id) => {
                self.form = None;
                let verb = match mode {
                    FormMode::Create => "created",
                    FormMode::Edit => "updated",
                };
                self.notifications.notify(
                    NotificationLevel::Success,
                    format!("{} {}", E::kind().singular(), verb),
                );
                Ok(id)
            }
            Err(e) => {
                warn!(entity = %E::kind(), error = %e, "submit failed");
                self.fail_form(e.to_string());
                Err(e)
            }
        }
    }

    fn fail_form(&mut self, message: String) {
        self.notifications.push(
            Notification::new(NotificationLevel::Error, message.clone())
                .with_action(NotificationAction::Dismiss),
        );
        if let Some(form) = self.form.as_mut() {
            form.error = Some(message);
        }
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Ask for confirmation before deleting.
    pub fn request_delete(&mut self, id: EntityId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<&EntityId> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Perform the pending delete. Returns `false` when nothing was pending.
    pub async fn confirm_delete(&mut self) -> ConsoleResult<bool> {
        self.ensure_idle()?;
        let Some(id) = self.pending_delete.take() else {
            return Ok(false);
        };

        self.state = ControllerState::Deleting;
        let result = self.store.remove(&id).await;
        if matches!(result, Err(ConsoleError::Unmounted)) {
            return Err(ConsoleError::Unmounted);
        }
        self.state = ControllerState::Ready;

        match result {
            Ok(_) => {
                self.notifications.notify(
                    NotificationLevel::Success,
                    format!("{} deleted", E::kind().singular()),
                );
                Ok(true)
            }
            Err(e) => {
                warn!(entity = %E::kind(), id = %id, error = %e, "delete failed");
                self.notifications.push(
                    Notification::new(NotificationLevel::Error, e.to_string())
                        .with_action(NotificationAction::Dismiss),
                );
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Filter, search and sort
    // ------------------------------------------------------------------

    /// Set one named filter. Names must be fields of the entity, and range
    /// filters are only accepted on integer fields. An integer field holds
    /// an exact value and a range side by side.
    pub fn set_filter(&mut self, name: &str, value: FilterValue) -> Result<(), FilterError> {
        let kind = E::schema()
            .kind_of(name)
            .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
        if matches!(value, FilterValue::Range { .. }) && kind != FieldKind::Integer {
            return Err(FilterError::RangeOnNonNumeric(name.to_string()));
        }
        self.filters.set(name, value);
        Ok(())
    }

    /// Drop both the exact value and the range of a field.
    pub fn clear_filter(&mut self, name: &str) {
        self.filters.remove(name);
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Reset every filter and the search query.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search.clear();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty() || !self.search.is_empty()
    }

    /// Chips for the active-filters bar, as `(field, label)` pairs.
    pub fn active_filters(&self) -> Vec<(String, String)> {
        let mut chips: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(name, value)| (name.to_string(), value.describe()))
            .collect();
        if !self.search.is_empty() {
            chips.push(("search".to_string(), self.search.clone()));
        }
        chips
    }

    /// Sort by `key`; selecting the current key flips the direction.
    pub fn set_sort(&mut self, key: &str) -> Result<(), FilterError> {
        if E::schema().field(key).is_none() {
            return Err(FilterError::UnknownField(key.to_string()));
        }
        self.sort.toggle(key);
        Ok(())
    }

    pub fn sort(&self) -> &SortConfig {
        &self.sort
    }

    /// Filtered then sorted view of the store.
    pub fn visible_rows(&self) -> Vec<&E> {
        let mut rows = filter_rows(self.store.all(), &self.filters, &self.search);
        sort_rows(&mut rows, &self.sort);
        rows
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().len()
    }

    pub fn total_count(&self) -> usize {
        self.store.len()
    }

    /// Distinct values of a field across all loaded records.
    pub fn facet(&self, field: &str, direction: SortDirection) -> Vec<String> {
        distinct_values(self.store.all(), field, direction)
    }
}
