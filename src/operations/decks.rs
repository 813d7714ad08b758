//! The four deck use-cases: new, add, draw and shuffle.
//!
//! Each mutating operation is a single [`Engine::update`] call, so the read,
//! the change and the write-back of one deck happen as one unit on the store
//! worker. Concurrent draws on the same deck therefore never hand out the same
//! card twice.

use rand::seq::SliceRandom;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::Engine;
use crate::error::{DeckError, Result};
use crate::models::{generate_standard_deck, Card, DeckSummary};

// ---------------------------------------------------------------------------
// DeckOperations
// ---------------------------------------------------------------------------

/// Deck operations bound to an [`Engine`].
pub struct DeckOperations<'a> {
    engine: &'a Engine,
}

impl<'a> DeckOperations<'a> {
    pub fn new(engine: &'a Engine) -> Self {
        Self { engine }
    }

    /// Create `count` fresh, unshuffled 52-card decks.
    ///
    /// Decks are created one after another. If one fails, the error is
    /// returned and the decks created before it stay in the store.
    pub async fn create(&self, count: usize) -> Result<Vec<DeckSummary>> {
        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let id = Uuid::new_v4().to_string();
            let cards = generate_standard_deck();
            let remaining = cards.len();
            self.engine.create(id.clone(), cards).await?;
            debug!(deck_id = %id, "created deck");
            created.push(DeckSummary::new(id, remaining));
        }
        info!(count, "created decks");
        Ok(created)
    }

    /// Append `cards` to the bottom of a deck.
    pub async fn add(&self, deck_id: &str, cards: Vec<Card>) -> Result<DeckSummary> {
        if cards.is_empty() {
            return Err(DeckError::BadRequest("No cards to add".into()));
        }
        let added = cards.len();
        let (remaining, _) = self
            .engine
            .update(deck_id, move |stored| {
                stored.extend(cards);
                Ok(Vec::new())
            })
            .await?;
        info!(deck_id, added, remaining, "added cards");
        Ok(DeckSummary::new(deck_id, remaining))
    }

    /// Take `n` cards from the top of a deck.
    ///
    /// Fails with [`DeckError::InsufficientCards`] without touching the deck
    /// when it holds fewer than `n` cards. Drawing zero cards is allowed.
    pub async fn draw(&self, deck_id: &str, n: usize) -> Result<DeckSummary> {
        let (remaining, drawn) = self
            .engine
            .update(deck_id, move |stored| {
                if n > stored.len() {
                    return Err(DeckError::InsufficientCards {
                        requested: n,
                        remaining: stored.len(),
                    });
                }
                Ok(stored.drain(..n).collect())
            })
            .await?;
        info!(deck_id, drawn = drawn.len(), remaining, "drew cards");
        Ok(DeckSummary::new(deck_id, remaining).with_cards(drawn))
    }

    /// Shuffle every card left in a deck with a uniform random permutation.
    pub async fn shuffle(&self, deck_id: &str) -> Result<DeckSummary> {
        let (remaining, _) = self
            .engine
            .update(deck_id, |stored| {
                stored.shuffle(&mut rand::thread_rng());
                Ok(Vec::new())
            })
            .await?;
        info!(deck_id, remaining, "shuffled deck");
        Ok(DeckSummary::new(deck_id, remaining))
    }
}

/// Parse a count-like request parameter.
///
/// A missing or blank value falls back to `default`. Anything else that is
/// not a non-negative integer is a [`DeckError::BadRequest`].
pub fn parse_count(name: &str, raw: Option<&str>, default: usize) -> Result<usize> {
    match raw.filter(|value| !value.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value.trim().parse::<usize>().map_err(|_| {
            DeckError::BadRequest(format!(
                "Parameter '{name}' must be a non-negative integer, got '{value}'"
            ))
        }),
    }
}
