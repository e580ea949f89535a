//! Application Context
//!
//! Store, API client and user-facing handlers shared via Leptos Context API.
//! Handlers spawn the optimistic mutators; failures are already rolled back
//! and alerted by the time they return.

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::HttpApi;
use crate::loader::load_initial_data;
use crate::models::{GardenId, NotificationId};
use crate::mutators::{BrowserAlert, MutationError, Optimistic};
use crate::store::{store_set_load_status, store_set_user, AppStore, LoadStatus};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub store: AppStore,
    /// Local storage: the client is only used on the UI thread
    api: StoredValue<HttpApi, LocalStorage>,
}

impl AppContext {
    pub fn new(store: AppStore, api: HttpApi) -> Self {
        Self {
            store,
            api: StoredValue::new_local(api),
        }
    }

    fn api(&self) -> HttpApi {
        self.api.get_value()
    }

    /// Fetch user, gardens and notifications, then populate the store
    pub fn load(&self) {
        let (store, api) = (self.store, self.api());
        spawn_local(async move {
            match load_initial_data(&api, &store).await {
                Ok(user) => {
                    store_set_user(&store, user);
                    store_set_load_status(&store, LoadStatus::Ready);
                }
                Err(e) => {
                    tracing::error!(error = %e, "initial load failed");
                    store_set_load_status(&store, LoadStatus::Failed(e.to_string()));
                }
            }
        });
    }

    pub fn rename_garden(&self, index: usize, name: String) {
        let (store, api) = (self.store, self.api());
        spawn_local(async move {
            report(Optimistic::new(&api, &store, &BrowserAlert).rename_garden(index, &name).await);
        });
    }

    pub fn resize_garden(&self, index: usize, width: usize, height: usize) {
        let (store, api) = (self.store, self.api());
        spawn_local(async move {
            report(Optimistic::new(&api, &store, &BrowserAlert).resize_garden(index, width, height).await);
        });
    }

    pub fn add_garden(&self, name: String, width: usize, height: usize) {
        let (store, api) = (self.store, self.api());
        spawn_local(async move {
            let result: Result<GardenId, _> =
                Optimistic::new(&api, &store, &BrowserAlert).add_garden(&name, width, height).await;
            report(result);
        });
    }

    pub fn delete_garden(&self, index: usize) {
        let (store, api) = (self.store, self.api());
        spawn_local(async move {
            report(Optimistic::new(&api, &store, &BrowserAlert).delete_garden(index).await);
        });
    }

    pub fn add_notification(
        &self,
        garden_index: usize,
        name: String,
        interval: u32,
        next_due: NaiveDate,
        plant_names: Vec<String>,
    ) {
        let (store, api) = (self.store, self.api());
        spawn_local(async move {
            let result: Result<NotificationId, _> = Optimistic::new(&api, &store, &BrowserAlert)
                .add_notification(garden_index, &name, interval, next_due, plant_names)
                .await;
            report(result);
        });
    }

    pub fn delete_notification(&self, garden_index: usize, notification_id: NotificationId) {
        let (store, api) = (self.store, self.api());
        spawn_local(async move {
            report(
                Optimistic::new(&api, &store, &BrowserAlert)
                    .delete_notification(garden_index, notification_id)
                    .await,
            );
        });
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

fn report<T>(result: Result<T, MutationError>) {
    if let Err(MutationError::Rejected(e)) = result {
        tracing::debug!(error = %e, "change not applied");
    }
}
