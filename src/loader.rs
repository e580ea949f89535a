//! Initial Data Loader
//!
//! Fetches user, gardens and notifications concurrently, then seeds the
//! store with a single `Populate`.

use thiserror::Error;

use crate::commands::{ApiError, GardenApi};
use crate::format::{format_gardens, format_notifications};
use crate::models::User;
use crate::reducer::GardenAction;
use crate::store::GardenStateHandle;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to load {what}: {source}")]
pub struct LoadError {
    pub what: &'static str,
    #[source]
    pub source: ApiError,
}

impl LoadError {
    fn fetch(what: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| Self { what, source }
    }
}

/// Load everything the garden view needs.
///
/// The first failed request aborts the whole load and nothing is
/// populated. If the state was populated meanwhile, the fetched gardens
/// are dropped.
pub async fn load_initial_data<A, S>(api: &A, state: &S) -> Result<User, LoadError>
where
    A: GardenApi + ?Sized,
    S: GardenStateHandle + ?Sized,
{
    let (user, gardens, notifications) = futures::try_join!(
        async { api.current_user().await.map_err(LoadError::fetch("user")) },
        async { api.list_gardens().await.map_err(LoadError::fetch("gardens")) },
        async { api.list_notifications().await.map_err(LoadError::fetch("notifications")) },
    )?;

    tracing::info!(
        gardens = gardens.len(),
        notification_groups = notifications.len(),
        "initial data fetched"
    );

    if state.snapshot().is_populated() {
        tracing::debug!("gardens already populated, fetched data dropped");
        return Ok(user);
    }

    let index = format_notifications(&notifications);
    let formatted = format_gardens(&gardens, &index);
    if let Err(e) = state.dispatch(GardenAction::Populate(formatted)) {
        tracing::debug!(error = %e, "populate skipped");
    }

    Ok(user)
}
