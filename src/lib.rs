// AppDeck - Library Entry Point
// Discovers HTML mini-apps, keeps them in a local store and serves the
// launcher grid.

pub mod constants;
pub mod error;
pub mod db;
pub mod sources;
pub mod icon;
pub mod reconcile;
pub mod query;
pub mod config;
pub mod launcher;
pub mod commands;

#[cfg(test)]
mod test_support;

pub use commands::{Card, Dashboard, EditMode, Intent, Notice, ViewState};
pub use config::Config;
pub use error::{DeckError, Result};
pub use reconcile::SyncReport;
