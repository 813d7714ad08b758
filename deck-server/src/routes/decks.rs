use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use deck_service::{parse_card_codes, parse_count, AddCardsResponse, DeckSummary};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NewDeckParams {
    pub count: Option<String>,
}

#[derive(Deserialize)]
pub struct AddCardsParams {
    pub cards: Option<String>,
}

#[derive(Deserialize)]
pub struct DrawParams {
    #[serde(rename = "nbrCarte")]
    pub nbr_carte: Option<String>,
}

/// /deck/new?count=2
///
/// Create `count` (default 1) fresh 52-card decks.
pub async fn new_decks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewDeckParams>,
) -> Result<Json<Vec<DeckSummary>>, AppError> {
    let count = parse_count("count", params.count.as_deref(), 1)?;
    let decks = state.service.decks().create(count).await?;
    Ok(Json(decks))
}

/// /deck/add/:deck_id?cards=AS,2S
///
/// Append the listed card codes to the bottom of a deck.
pub async fn add_cards(
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<String>,
    Query(params): Query<AddCardsParams>,
) -> Result<Json<AddCardsResponse>, AppError> {
    let raw = params
        .cards
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Missing required query parameter: cards"))?;
    let cards = parse_card_codes(&raw)?;
    let added = cards.len();

    state.service.decks().add(&deck_id, cards).await?;
    Ok(Json(AddCardsResponse::success(added)))
}

/// /deck/draw/:deck_id?nbrCarte=5
///
/// Draw `nbrCarte` (default 1) cards from the top of a deck.
pub async fn draw_cards(
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<String>,
    Query(params): Query<DrawParams>,
) -> Result<Json<DeckSummary>, AppError> {
    let n = parse_count("nbrCarte", params.nbr_carte.as_deref(), 1)?;
    let hand = state.service.decks().draw(&deck_id, n).await?;
    Ok(Json(hand))
}

/// /deck/shuffle/:deck_id
///
/// Shuffle the cards left in a deck. The new order is not returned.
pub async fn shuffle_deck(
    State(state): State<Arc<AppState>>,
    Path(deck_id): Path<String>,
) -> Result<Json<DeckSummary>, AppError> {
    let summary = state.service.decks().shuffle(&deck_id).await?;
    Ok(Json(summary))
}

