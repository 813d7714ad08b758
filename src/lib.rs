//! Playing-card deck service.
//!
//! Decks are stored in DuckDB as one row per deck (id -> JSON card array).
//! All access to the store goes through a single worker thread (the
//! [`Engine`]), so concurrent requests never interleave their reads and writes.
//!
//! # Quick start
//!
//! ```no_run
//! use deck_service::DeckService;
//!
//! # async fn example() -> deck_service::Result<()> {
//! let service = DeckService::builder().path("decks.duckdb").build()?;
//!
//! let decks = service.decks().create(1).await?;
//! let hand = service.decks().draw(&decks[0].deck_id, 5).await?;
//! assert_eq!(hand.remaining, 47);
//!
//! service.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod models;
pub mod operations;

pub use connection::{Connection, StoreLocation};
pub use engine::{Command, Engine, EngineOptions, Reply};
pub use error::{DeckError, Result};
pub use models::{
    generate_standard_deck, parse_card_codes, AddCardsResponse, Card, DeckSummary, Suit,
};
pub use operations::{parse_count, DeckOperations};

use std::fmt;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::info;

// ---------------------------------------------------------------------------
// DeckServiceBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`DeckService`].
///
/// Use [`DeckService::builder()`] to obtain one, chain configuration methods,
/// and call [`build()`](DeckServiceBuilder::build).
pub struct DeckServiceBuilder {
    location: StoreLocation,
    command_timeout: Option<Duration>,
    queue_capacity: usize,
}

impl Default for DeckServiceBuilder {
    fn default() -> Self {
        Self {
            location: StoreLocation::File(config::default_db_path()),
            command_timeout: Some(config::DEFAULT_COMMAND_TIMEOUT),
            queue_capacity: config::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl DeckServiceBuilder {
    /// Store decks in the DuckDB database file at `path`.
    ///
    /// If not set, `decks.duckdb` in the platform data directory is used
    /// (e.g. `~/.local/share/deck-service` on Linux).
    pub fn path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.location = StoreLocation::File(path.as_ref().to_path_buf());
        self
    }

    /// Keep decks in memory only. Everything is lost on close.
    pub fn in_memory(mut self) -> Self {
        self.location = StoreLocation::InMemory;
        self
    }

    /// Fail a request with [`DeckError::Timeout`] if its store command has
    /// not answered within `timeout`.
    ///
    /// Defaults to 30 seconds.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Wait for store commands without any time limit.
    pub fn no_timeout(mut self) -> Self {
        self.command_timeout = None;
        self
    }

    /// Number of commands that may wait in the store queue.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Open the store and start its worker thread.
    ///
    /// Blocks until the store is open. Failing to open the store is returned
    /// here, which is the point where a server should give up on startup.
    pub fn build(self) -> Result<DeckService> {
        let options = EngineOptions {
            location: self.location.clone(),
            command_timeout: self.command_timeout,
            queue_capacity: self.queue_capacity,
        };
        let (engine, worker) = Engine::start(options)?;
        info!(location = %self.location, "deck service ready");
        Ok(DeckService {
            engine,
            worker: Some(worker),
            location: self.location,
        })
    }
}

// ---------------------------------------------------------------------------
// DeckService
// ---------------------------------------------------------------------------

/// Entry point of the deck service.
///
/// Owns the store [`Engine`] and its worker thread. Create one at startup,
/// share it (e.g. behind an `Arc`) with every request handler, and
/// [`close`](DeckService::close) it on shutdown.
pub struct DeckService {
    engine: Engine,
    worker: Option<JoinHandle<()>>,
    location: StoreLocation,
}

impl DeckService {
    pub fn builder() -> DeckServiceBuilder {
        DeckServiceBuilder::default()
    }

    /// Access the deck operations (new, add, draw, shuffle).
    pub fn decks(&self) -> DeckOperations<'_> {
        DeckOperations::new(&self.engine)
    }

    /// Return the underlying [`Engine`] for raw command access.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Path of the database file, if the store is file-backed.
    pub fn db_path(&self) -> Option<PathBuf> {
        match &self.location {
            StoreLocation::File(path) => Some(path.clone()),
            StoreLocation::InMemory => None,
        }
    }

    /// Stop the store worker once every queued command has run, and wait for
    /// it to exit.
    pub async fn close(mut self) -> Result<()> {
        self.engine.shutdown().await?;
        if let Some(worker) = self.worker.take() {
            tokio::task::spawn_blocking(move || worker.join())
                .await
                .map_err(|e| DeckError::Storage(format!("Task join error: {e}")))?
                .map_err(|_| DeckError::Storage("deck store worker panicked".into()))?;
        }
        info!(location = %self.location, "deck service closed");
        Ok(())
    }
}

impl fmt::Display for DeckService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DeckService(location={}, timeout={:?})",
            self.location,
            self.engine.timeout()
        )
    }
}
