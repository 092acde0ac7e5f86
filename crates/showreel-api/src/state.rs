//! Shared application state.

use std::sync::Arc;

use showreel_catalog::Catalog;
use showreel_playback::application::player::PlayerHandle;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the player task.
    pub player: PlayerHandle,
    /// The catalog being played.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(player: PlayerHandle, catalog: Arc<Catalog>) -> Self {
        Self { player, catalog }
    }
}
