//! New Garden Form Component
//!
//! Name input plus a size preset; submits through the optimistic add.

use leptos::prelude::*;

use crate::context::use_app_context;

/// Grid presets (width, height, label)
const GARDEN_SIZES: &[(usize, usize, &str)] = &[
    (2, 2, "2×2"),
    (4, 4, "4×4"),
    (4, 8, "4×8"),
    (8, 8, "8×8"),
];

#[component]
pub fn NewGardenForm() -> impl IntoView {
    let ctx = use_app_context();

    let (name, set_name) = signal(String::new());
    let (size, set_size) = signal((4usize, 4usize));

    let create_garden = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = name.get();
        if text.trim().is_empty() {
            return;
        }
        let (width, height) = size.get();
        ctx.add_garden(text.trim().to_string(), width, height);
        set_name.set(String::new());
    };

    view! {
        <form class="new-garden-form" on:submit=create_garden>
            <div class="new-garden-row">
                <input
                    type="text"
                    placeholder="New garden name..."
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <button type="submit">"Add"</button>
            </div>

            <div class="size-selector-row">
                {GARDEN_SIZES.iter().map(|&(width, height, label)| {
                    let is_selected = move || size.get() == (width, height);
                    view! {
                        <button
                            type="button"
                            class=move || if is_selected() { "size-btn small active" } else { "size-btn small" }
                            on:click=move |_| set_size.set((width, height))
                        >
                            {label}
                        </button>
                    }
                }).collect_view()}
            </div>
        </form>
    }
}
