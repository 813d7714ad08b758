//! Shared test fixtures for the deck service integration tests.
//!
//! Provides in-memory and file-backed services plus a few helpers for
//! comparing card sequences.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use deck_service::{Card, DeckService};

/// A service over an in-memory store with a generous command timeout.
pub fn in_memory_service() -> DeckService {
    DeckService::builder()
        .in_memory()
        .command_timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// A service over a DuckDB file inside a fresh temporary directory.
///
/// Returns `(DeckService, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for as long as the database file is needed.
pub fn file_service() -> (DeckService, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let service = DeckService::builder()
        .path(tmp_dir.path().join("decks.duckdb"))
        .build()
        .unwrap();
    (service, tmp_dir)
}

/// Create one deck and return its id.
pub async fn new_deck(service: &DeckService) -> String {
    let mut decks = service.decks().create(1).await.unwrap();
    decks.remove(0).deck_id
}

pub fn codes(cards: &[Card]) -> Vec<String> {
    cards.iter().map(|c| c.code.clone()).collect()
}

/// Multiset of card codes, for order-insensitive comparison.
pub fn code_counts(cards: &[Card]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for card in cards {
        *counts.entry(card.code.clone()).or_insert(0) += 1;
    }
    counts
}
