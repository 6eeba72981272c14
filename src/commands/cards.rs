// AppDeck - Grid Model
// What each tile in the launcher grid shows. Pure, built from ViewState.

use serde::Serialize;

use crate::constants::{BADGE_BUNDLED, BADGE_FILE, BADGE_FOLDER, FALLBACK_GLYPH_CARD};
use crate::db::schema::AppSource;
use crate::icon::fallback_icon;
use super::dashboard::ViewState;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub filename: String,
    pub icon: String,
    pub badge: &'static str,
    /// Drag and delete affordances are live (edit mode).
    pub editable: bool,
}

pub fn badge_for(source: AppSource) -> &'static str {
    match source {
        AppSource::Bundled => BADGE_BUNDLED,
        AppSource::Folder => BADGE_FOLDER,
        AppSource::File => BADGE_FILE,
    }
}

/// Visible apps in grid order.
pub fn cards(view: &ViewState) -> Vec<Card> {
    let editable = view.mode.is_editing();

    view.visible_apps()
        .into_iter()
        .map(|app| Card {
            id: app.id.clone(),
            name: app.name.clone(),
            filename: app.filename.clone(),
            icon: if app.icon.trim().is_empty() {
                fallback_icon(FALLBACK_GLYPH_CARD)
            } else {
                app.icon.clone()
            },
            badge: badge_for(app.source),
            editable,
        })
        .collect()
}
