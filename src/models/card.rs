use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{IMAGE_ROUTE, STANDARD_DECK_SIZE};
use crate::error::{DeckError, Result};

// ---------------------------------------------------------------------------
// Suit
// ---------------------------------------------------------------------------

/// Card suit, serialized as its single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "h")]
    Hearts,
    #[serde(rename = "d")]
    Diamonds,
    #[serde(rename = "c")]
    Clubs,
    #[serde(rename = "s")]
    Spades,
}

impl Suit {
    /// Suits in standard deck generation order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn letter(self) -> char {
        match self {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        }
    }

    /// Parse a suit letter, ignoring case.
    pub fn from_letter(letter: char) -> Option<Suit> {
        match letter.to_ascii_lowercase() {
            'h' => Some(Suit::Hearts),
            'd' => Some(Suit::Diamonds),
            'c' => Some(Suit::Clubs),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A single playing card as stored in a deck and returned to clients.
///
/// `code` is always `rank` followed by the suit letter. Generated cards use the
/// literal numerals `1`..`13` as ranks; cards added by clients keep whatever
/// rank text they were given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub code: String,
    pub image: String,
    pub rank: String,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: impl Into<String>, suit: Suit) -> Self {
        let rank = rank.into();
        let code = format!("{}{}", rank, suit.letter());
        Self::from_parts(code, rank, suit)
    }

    /// Parse a raw card code such as `"7h"` or `"AS"`.
    ///
    /// The only check is that the code is non-empty and its last character is
    /// a suit letter, so `"10"` or `"JOKER"` are rejected. Everything before
    /// the letter is kept as the rank without checking it against a catalog.
    /// The code itself is stored exactly as given (after trimming).
    pub fn from_code(code: &str) -> Result<Self> {
        let code = code.trim();
        let mut chars = code.chars();
        let letter = chars
            .next_back()
            .ok_or_else(|| DeckError::BadRequest("Empty card code".into()))?;
        let rank = chars.as_str();
        if rank.is_empty() {
            return Err(DeckError::BadRequest(format!(
                "Card code '{code}' has no rank"
            )));
        }
        let suit = Suit::from_letter(letter).ok_or_else(|| {
            DeckError::BadRequest(format!(
                "Card code '{code}' does not end with a suit letter (h, d, c, s)"
            ))
        })?;
        Ok(Self::from_parts(code.to_string(), rank.to_string(), suit))
    }

    fn from_parts(code: String, rank: String, suit: Suit) -> Self {
        let image = format!("{IMAGE_ROUTE}/{code}.png");
        Self {
            code,
            image,
            rank,
            suit,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Build the 52-card deck in creation order: h1..h13, d1..d13, c1..c13, s1..s13.
pub fn generate_standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(STANDARD_DECK_SIZE);
    for suit in Suit::ALL {
        for rank in 1..=13 {
            deck.push(Card::new(rank.to_string(), suit));
        }
    }
    deck
}

/// Parse a comma-separated list of card codes (`"AS,2S,10h"`).
pub fn parse_card_codes(raw: &str) -> Result<Vec<Card>> {
    if raw.trim().is_empty() {
        return Err(DeckError::BadRequest("No card codes given".into()));
    }
    raw.split(',').map(Card::from_code).collect()
}

