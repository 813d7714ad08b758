pub mod assets;
pub mod decks;

use axum::http::Uri;

use crate::error::AppError;

/// Deck actions that need a `/{deck_id}` segment after them.
const ID_ACTIONS: [&str; 3] = ["add", "draw", "shuffle"];

/// Fallback for every path no route matches.
///
/// `/deck/draw` and friends without a deck id are a bad request rather than
/// an unknown route.
pub async fn not_found(uri: Uri) -> AppError {
    let path = uri.path();
    let action = path
        .strip_prefix("/deck/")
        .map(|rest| rest.trim_end_matches('/'));
    match action {
        Some(action) if ID_ACTIONS.contains(&action) => {
            AppError::bad_request(format!("Missing deck id in URL for '{action}'"))
        }
        _ => AppError::not_found(format!("No route for {path}")),
    }
}
