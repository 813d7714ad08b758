use std::path::PathBuf;

use deck_service::DeckService;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The deck service. Every deck route goes through its single store
    /// worker.
    pub service: DeckService,

    /// Directory holding `{card_code}.png` images for `/static/{card_code}`.
    pub static_dir: PathBuf,
}
