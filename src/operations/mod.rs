//! Operation modules for the deck service.
//!
//! Each module provides a struct that borrows the service's
//! [`Engine`](crate::engine::Engine) and exposes async methods returning
//! `Result<T>` with typed payloads.

pub mod decks;

pub use decks::{parse_count, DeckOperations};
