use std::io::ErrorKind;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// GET /static/:card_code
///
/// Serve `{static_dir}/{card_code}.png`. Only ASCII alphanumeric codes are
/// looked up, so a request can never leave the static directory.
pub async fn card_image(
    State(state): State<Arc<AppState>>,
    Path(card_code): Path<String>,
) -> Result<Response, AppError> {
    if card_code.is_empty() || !card_code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::not_found(format!("No image for '{card_code}'")));
    }

    let path = state.static_dir.join(format!("{card_code}.png"));
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AppError::not_found(format!("No image for '{card_code}'")))
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read card image");
            Err(AppError::internal("Failed to read card image"))
        }
    }
}
