//! Garden Tracker Frontend Entry Point

use garden_tracker_ui::app::App;
use garden_tracker_ui::config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_build_env();
    if let Err(e) = console_logger::init_logger("GardenTracker", config.debug) {
        leptos::logging::warn!("{}", e);
    }

    mount_to_body(move || view! { <App config=config.clone() /> });
}
