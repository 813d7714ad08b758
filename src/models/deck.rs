use serde::{Deserialize, Serialize};

use super::card::Card;

// ---------------------------------------------------------------------------
// DeckSummary
// ---------------------------------------------------------------------------

/// A transient view of a deck after an operation.
///
/// `remaining` is computed from the stored card sequence at the time of the
/// operation. `cards` is only present for draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub deck_id: String,
    pub remaining: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
}

impl DeckSummary {
    pub fn new(deck_id: impl Into<String>, remaining: usize) -> Self {
        Self {
            deck_id: deck_id.into(),
            remaining,
            cards: None,
        }
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = Some(cards);
        self
    }
}

// ---------------------------------------------------------------------------
// AddCardsResponse
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCardsResponse {
    pub status: String,
    pub message: String,
}

impl AddCardsResponse {
    pub fn success(added: usize) -> Self {
        Self {
            status: "success".into(),
            message: format!("{added} card(s) added to deck"),
        }
    }
}
