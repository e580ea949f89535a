//! Garden Tracker Frontend
//!
//! Layered like the backend it talks to:
//! - models / format: wire types and their normalization into grids
//! - reducer / store: validated state transitions behind a reactive store
//! - commands / loader / mutators: REST bindings, initial load, optimistic edits
//! - context / app: Leptos glue

pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod format;
pub mod loader;
pub mod models;
pub mod mutators;
pub mod reducer;
pub mod store;

mod components;
