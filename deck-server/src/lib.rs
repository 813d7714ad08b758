//! HTTP/JSON front end for the deck service.
//!
//! Maps `/deck/...` requests onto [`deck_service::DeckOperations`] and serves
//! card images from a static directory. All deck state lives behind the
//! service's store engine; this crate only decodes requests and encodes
//! responses.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::AppError;
pub use state::AppState;

/// Build the application router over shared state.
///
/// Deck routes answer both GET and POST.
pub fn router(state: Arc<AppState>) -> Router {
    use routes::{assets, decks};

    Router::new()
        .route("/deck/new", get(decks::new_decks).post(decks::new_decks))
        .route(
            "/deck/add/{deck_id}",
            get(decks::add_cards).post(decks::add_cards),
        )
        .route(
            "/deck/draw/{deck_id}",
            get(decks::draw_cards).post(decks::draw_cards),
        )
        .route(
            "/deck/shuffle/{deck_id}",
            get(decks::shuffle_deck).post(decks::shuffle_deck),
        )
        .route("/static/{card_code}", get(assets::card_image))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
