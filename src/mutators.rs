//! Optimistic Mutators
//!
//! User-initiated changes are applied to local state first, then sent to
//! the backend. A failed request restores the snapshot taken before the
//! change and alerts the user.

use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::NaiveDate;
use thiserror::Error;

use crate::commands::{ApiError, CreateGardenArgs, CreateNotificationArgs, GardenApi, UpdateGardenArgs};
use crate::models::{
    Garden, GardenDraft, GardenId, GardenPatch, NotificationDraft, NotificationId, NotificationPatch,
};
use crate::reducer::{GardenAction, GardensState, ReducerError};
use crate::store::GardenStateHandle;

/// Surfaces failures to the user.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// `window.alert` in the browser
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserAlert;

impl Notifier for BrowserAlert {
    #[cfg(target_arch = "wasm32")]
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn alert(&self, message: &str) {
        tracing::error!(%message, "alert");
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    /// Local validation failed; nothing was sent
    #[error("change rejected: {0}")]
    Rejected(#[from] ReducerError),
    /// The request failed and local state was rolled back
    #[error("server rejected change: {0}")]
    Api(#[from] ApiError),
}

/// Placeholder ids for records the server has not confirmed yet
static NEXT_PENDING_ID: AtomicI64 = AtomicI64::new(-1);

fn pending_id() -> i64 {
    NEXT_PENDING_ID.fetch_sub(1, Ordering::Relaxed)
}

/// Optimistic garden and notification edits over one state handle.
pub struct Optimistic<'a, A: ?Sized, S: ?Sized, N: ?Sized> {
    api: &'a A,
    state: &'a S,
    notifier: &'a N,
}

impl<'a, A, S, N> Optimistic<'a, A, S, N>
where
    A: GardenApi + ?Sized,
    S: GardenStateHandle + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(api: &'a A, state: &'a S, notifier: &'a N) -> Self {
        Self { api, state, notifier }
    }

    pub async fn rename_garden(&self, index: usize, name: &str) -> Result<(), MutationError> {
        let snapshot = self.state.snapshot();
        let garden = garden_at(&snapshot, index)?;
        self.state.dispatch(GardenAction::UpdateGarden {
            index,
            patch: GardenPatch::rename(name),
        })?;

        let args = UpdateGardenArgs {
            name,
            width: garden.width,
            height: garden.height,
        };
        self.confirm(snapshot, "Could not rename the garden.", self.api.update_garden(garden.id, &args))
            .await
    }

    pub async fn resize_garden(&self, index: usize, width: usize, height: usize) -> Result<(), MutationError> {
        let snapshot = self.state.snapshot();
        let garden = garden_at(&snapshot, index)?;
        self.state.dispatch(GardenAction::UpdateGarden {
            index,
            patch: GardenPatch::resize(width, height),
        })?;

        let args = UpdateGardenArgs {
            name: &garden.name,
            width,
            height,
        };
        self.confirm(snapshot, "Could not resize the garden.", self.api.update_garden(garden.id, &args))
            .await
    }

    /// Prepend a new garden; returns the id the server assigned.
    pub async fn add_garden(&self, name: &str, width: usize, height: usize) -> Result<GardenId, MutationError> {
        let snapshot = self.state.snapshot();
        let temp_id = pending_id();
        self.state.dispatch(GardenAction::AddGarden {
            draft: GardenDraft {
                id: Some(temp_id),
                name: Some(name.to_string()),
                width: Some(width),
                height: Some(height),
            },
            index: None,
        })?;

        let args = CreateGardenArgs { name, width, height };
        let created = self
            .confirm(snapshot, "Could not add the garden.", self.api.create_garden(&args))
            .await?;

        match self.state.snapshot().position(temp_id) {
            Some(index) => self.rekey(GardenAction::UpdateGarden {
                index,
                patch: GardenPatch {
                    id: Some(created.id),
                    ..Default::default()
                },
            }),
            None => tracing::debug!(temp_id, id = created.id, "pending garden gone before confirmation"),
        }
        Ok(created.id)
    }

    pub async fn delete_garden(&self, index: usize) -> Result<(), MutationError> {
        let snapshot = self.state.snapshot();
        let garden = garden_at(&snapshot, index)?;
        self.state.dispatch(GardenAction::RemoveGarden { index })?;

        self.confirm(snapshot, "Could not delete the garden.", self.api.delete_garden(garden.id))
            .await
    }

    /// Append a care reminder; returns the id the server assigned.
    pub async fn add_notification(
        &self,
        garden_index: usize,
        name: &str,
        interval: u32,
        next_due: NaiveDate,
        plant_names: Vec<String>,
    ) -> Result<NotificationId, MutationError> {
        let snapshot = self.state.snapshot();
        let garden = garden_at(&snapshot, garden_index)?;
        let temp_id = pending_id();
        self.state.dispatch(GardenAction::AddNotification {
            garden_index,
            draft: NotificationDraft {
                id: Some(temp_id),
                name: Some(name.to_string()),
                interval: Some(interval),
                next_due: Some(next_due),
                plant_names: Some(plant_names.clone()),
            },
        })?;

        let args = CreateNotificationArgs {
            garden: garden.id,
            name,
            interval,
            next_due,
            plant_names: &plant_names,
        };
        let created = self
            .confirm(snapshot, "Could not add the reminder.", self.api.create_notification(&args))
            .await?;

        match self.state.snapshot().position(garden.id) {
            Some(garden_index) => self.rekey(GardenAction::UpdateNotification {
                garden_index,
                notification_id: temp_id,
                patch: NotificationPatch {
                    id: Some(created.id),
                    ..Default::default()
                },
            }),
            None => tracing::debug!(garden = garden.id, "garden gone before reminder confirmation"),
        }
        Ok(created.id)
    }

    pub async fn delete_notification(
        &self,
        garden_index: usize,
        notification_id: NotificationId,
    ) -> Result<(), MutationError> {
        let snapshot = self.state.snapshot();
        self.state.dispatch(GardenAction::RemoveNotification {
            garden_index,
            notification_id,
        })?;

        self.confirm(
            snapshot,
            "Could not delete the reminder.",
            self.api.delete_notification(notification_id),
        )
        .await
    }

    /// Await the request; on failure restore `snapshot` and alert.
    ///
    /// The whole collection goes back to `snapshot`, so a change that landed
    /// while `request` was in flight is discarded with it. Local state may then
    /// lag the server until the next full load.
    async fn confirm<T>(
        &self,
        snapshot: GardensState,
        failure: &str,
        request: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, MutationError> {
        match request.await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(error = %e, "{} Rolling back.", failure);
                if let Err(restore) = self.state.dispatch(GardenAction::Restore(snapshot)) {
                    tracing::error!(error = %restore, "rollback failed");
                }
                self.notifier.alert(failure);
                Err(e.into())
            }
        }
    }

    /// Swap a pending id for the confirmed one.
    fn rekey(&self, action: GardenAction) {
        if let Err(e) = self.state.dispatch(action) {
            tracing::warn!(error = %e, "could not apply confirmed id");
        }
    }
}

fn garden_at(state: &GardensState, index: usize) -> Result<Garden, ReducerError> {
    if !state.is_populated() {
        return Err(ReducerError::NotPopulated);
    }
    let gardens = state.gardens();
    gardens
        .get(index)
        .cloned()
        .ok_or(ReducerError::GardenIndex { index, len: gardens.len() })
}
