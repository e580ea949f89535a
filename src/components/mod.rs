//! UI Components
//!
//! Small Leptos components wired to the optimistic handlers in [`AppContext`].
//!
//! [`AppContext`]: crate::context::AppContext

mod delete_garden_button;
mod new_garden_form;

pub use delete_garden_button::DeleteGardenButton;
pub use new_garden_form::NewGardenForm;
