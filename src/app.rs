//! Garden Tracker App
//!
//! Root component: builds the store and API client, provides them via
//! `AppContext` and starts the initial load.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::commands::HttpApi;
use crate::components::{DeleteGardenButton, NewGardenForm};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::store::{store_gardens, store_load_status, store_set_load_status, AppState, LoadStatus};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let store = Store::new(AppState::new(config.reducer_options()));

    match HttpApi::new(&config) {
        Ok(api) => {
            let ctx = AppContext::new(store, api);
            provide_context(ctx);
            // Load once on mount
            Effect::new(move |_| ctx.load());
        }
        Err(e) => {
            tracing::error!(error = %e, "api client unavailable");
            store_set_load_status(&store, LoadStatus::Failed(e.to_string()));
        }
    }

    view! {
        <main class="garden-app">
            <h1>"Gardens"</h1>
            {move || match store_load_status(&store) {
                LoadStatus::Loading => view! { <p class="loading">"Loading..."</p> }.into_any(),
                LoadStatus::Failed(msg) => view! { <p class="load-error">{msg}</p> }.into_any(),
                LoadStatus::Ready => {
                    let state = store_gardens(&store);
                    view! {
                        <NewGardenForm />
                        <ul class="garden-list">
                            {state
                                .gardens()
                                .iter()
                                .enumerate()
                                .map(|(index, garden)| {
                                    let summary = format!(
                                        "{} ({}x{}, {} planted, {} reminders)",
                                        garden.name,
                                        garden.width,
                                        garden.height,
                                        garden.planted_count(),
                                        garden.notifications.len(),
                                    );
                                    view! {
                                        <li class="garden-row">
                                            <span class="garden-summary">{summary}</span>
                                            <DeleteGardenButton index=index name=garden.name.clone() />
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    }.into_any()
                }
            }}
        </main>
    }
}
