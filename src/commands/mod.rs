// AppDeck - Commands Module
// Everything the renderer can ask for, organized by concern

pub mod library;
pub mod dashboard;
pub mod cards;
pub mod intents;

pub use library::{delete_app, reorder, reset_all};
pub use dashboard::{Dashboard, EditMode, ViewState};
pub use cards::{cards, Card};
pub use intents::{Intent, Notice};
