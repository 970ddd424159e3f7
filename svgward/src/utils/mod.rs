pub mod config_locator;
pub mod recording_store;
