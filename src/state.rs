// src/state.rs

use std::sync::Arc;

use crate::list_view::CardSettings;
use crate::sessions::PageSessions;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<PageSessions>,
    pub card_settings: CardSettings,
    pub static_dir: String,
}
