//! Delete Garden Button
//!
//! Inline two-step delete: × first, then confirm/cancel.

use leptos::prelude::*;

use crate::context::use_app_context;

#[component]
pub fn DeleteGardenButton(index: usize, #[prop(into)] name: String) -> impl IntoView {
    let ctx = use_app_context();
    let (confirming, set_confirming) = signal(false);
    let title = format!("Delete {}", name);

    view! {
        <Show
            when=move || confirming.get()
            fallback=move || view! {
                <button class="delete-btn" title=title.clone() on:click=move |_| set_confirming.set(true)>
                    "×"
                </button>
            }
        >
            <span class="delete-confirm">
                <span class="delete-confirm-text">"Delete?"</span>
                <button
                    class="confirm-btn"
                    on:click=move |_| {
                        set_confirming.set(false);
                        ctx.delete_garden(index);
                    }
                >
                    "✓"
                </button>
                <button class="cancel-btn" on:click=move |_| set_confirming.set(false)>
                    "✗"
                </button>
            </span>
        </Show>
    }
}
