//! Client-side list of records for one entity collection.
//!
//! The store is a cache of the API's answers: a record only enters it once
//! the server has returned it, and leaves it once the server has confirmed
//! the delete. Ids are whatever the server assigned.

use crate::error::{ConsoleError, ConsoleResult};
use crate::liveness::Liveness;
use formation_client::{ApiClientError, EntityApi};
use formation_core::{Entity, EntityDraft, EntityId, FormMode};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct EntityStore<E: Entity, A: EntityApi<E>> {
    api: Arc<A>,
    items: Vec<E>,
    liveness: Liveness,
}

impl<E: Entity, A: EntityApi<E>> EntityStore<E, A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_liveness(api, Liveness::new())
    }

    pub fn with_liveness(api: Arc<A>, liveness: Liveness) -> Self {
        Self {
            api,
            items: Vec::new(),
            liveness,
        }
    }

    pub fn all(&self) -> &[E] {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    /// Replace the whole list.
    pub fn replace_all(&mut self, items: Vec<E>) {
        self.items = items;
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn ensure_mounted(&self) -> ConsoleResult<()> {
        if self.liveness.is_mounted() {
            Ok(())
        } else {
            debug!(entity = %E::kind(), "dropping response for unmounted screen");
            Err(ConsoleError::Unmounted)
        }
    }

    fn not_found(id: &EntityId) -> ConsoleError {
        ConsoleError::NotFound {
            kind: E::kind(),
            id: id.clone(),
        }
    }

    fn map_api_error(id: &EntityId, error: ApiClientError) -> ConsoleError {
        if error.is_not_found() {
            Self::not_found(id)
        } else {
            ConsoleError::Network(error)
        }
    }

    /// Fetch the full list. On failure the list is left empty.
    pub async fn load(&mut self) -> ConsoleResult<usize> {
        let result = self.api.list().await;
        self.ensure_mounted()?;
        match result {
            Ok(items) => {
                debug!(entity = %E::kind(), count = items.len(), "loaded records");
                self.items = items;
                Ok(self.items.len())
            }
            Err(e) => {
                warn!(entity = %E::kind(), error = %e, "failed to load records");
                self.items.clear();
                Err(ConsoleError::Network(e))
            }
        }
    }

    /// Create a record and append the server's copy.
    pub async fn create(&mut self, draft: &E::Draft) -> ConsoleResult<&E> {
        draft.validate(FormMode::Create)?;
        let result = self.api.create(draft).await;
        self.ensure_mounted()?;
        let created = result?;
        info!(entity = %E::kind(), id = %created.id(), "record created");
        self.items.push(created);
        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// Update a record in place with the server's copy.
    ///
    /// An id absent from the list fails with `NotFound` without calling
    /// the API.
    pub async fn update(&mut self, id: &EntityId, draft: &E::Draft) -> ConsoleResult<&E> {
        if self.position(id).is_none() {
            return Err(Self::not_found(id));
        }
        draft.validate(FormMode::Edit)?;
        let result = self.api.update(id, draft).await;
        self.ensure_mounted()?;
        let updated = result.map_err(|e| Self::map_api_error(id, e))?;
        let index = self.position(id).ok_or_else(|| Self::not_found(id))?;
        info!(entity = %E::kind(), id = %id, "record updated");
        self.items[index] = updated;
        Ok(&self.items[index])
    }

    /// Delete a record. The API is called even when the id is not in the
    /// list; the return value says whether a local row was removed.
    pub async fn remove(&mut self, id: &EntityId) -> ConsoleResult<bool> {
        let result = self.api.delete(id).await;
        self.ensure_mounted()?;
        result.map_err(|e| Self::map_api_error(id, e))?;
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        let removed = self.items.len() != before;
        info!(entity = %E::kind(), id = %id, removed, "record deleted");
        Ok(removed)
    }
}
