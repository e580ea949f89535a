//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The garden
//! collection only changes through [`GardenStateHandle::dispatch`], which
//! runs the reducer and swaps in the new snapshot.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::User;
use crate::reducer::{self, GardenAction, GardensState, ReducerError, ReducerOptions};

/// Progress of the initial fetch
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Signed-in user (sanitized)
    pub user: Option<User>,
    /// All gardens, in display order
    pub gardens: GardensState,
    pub load_status: LoadStatus,
    /// Injected into every dispatch
    pub reducer_options: ReducerOptions,
}

impl AppState {
    pub fn new(reducer_options: ReducerOptions) -> Self {
        Self {
            reducer_options,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Snapshot and dispatch access to the garden collection.
pub trait GardenStateHandle {
    fn snapshot(&self) -> GardensState;

    /// Run `action` through the reducer; rejected actions change nothing.
    fn dispatch(&self, action: GardenAction) -> Result<(), ReducerError>;
}

impl GardenStateHandle for AppStore {
    fn snapshot(&self) -> GardensState {
        self.gardens().get_untracked()
    }

    fn dispatch(&self, action: GardenAction) -> Result<(), ReducerError> {
        let options = self.reducer_options().get_untracked();
        let mut next = self.gardens().get_untracked();
        reducer::dispatch(&mut next, action, &options)?;
        self.gardens().set(next);
        Ok(())
    }
}

// ========================
// Store Helper Functions
// ========================

/// Tracked read of the garden collection
pub fn store_gardens(store: &AppStore) -> GardensState {
    store.gardens().get()
}

/// Tracked read of the load status
pub fn store_load_status(store: &AppStore) -> LoadStatus {
    store.load_status().get()
}

/// Record the signed-in user
pub fn store_set_user(store: &AppStore, user: User) {
    store.user().set(Some(user));
}

pub fn store_set_load_status(store: &AppStore, status: LoadStatus) {
    store.load_status().set(status);
}

/// Plain, non-reactive state holder
#[cfg(test)]
#[derive(Debug, Default)]
pub struct LocalStore {
    state: std::cell::RefCell<GardensState>,
    options: ReducerOptions,
}

#[cfg(test)]
impl LocalStore {
    pub fn populated(gardens: Vec<crate::models::Garden>) -> Self {
        Self {
            state: std::cell::RefCell::new(GardensState::Populated(gardens)),
            options: ReducerOptions { debug: true },
        }
    }
}

#[cfg(test)]
impl GardenStateHandle for LocalStore {
    fn snapshot(&self) -> GardensState {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: GardenAction) -> Result<(), ReducerError> {
        reducer::dispatch(&mut self.state.borrow_mut(), action, &self.options)
    }
}
