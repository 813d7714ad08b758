//! DuckDB connection wrapper holding the durable `decks` table.
//!
//! Each row maps a deck id to the JSON-encoded card sequence of that deck.
//! All statements are parameterized; ids and card payloads never end up in
//! SQL text.
//!
//! A [`Connection`] is not thread-safe. It is owned by the engine worker
//! (see [`crate::engine`]), which is what serializes access to the store.

use std::path::{Path, PathBuf};

use duckdb::{params, Connection as DuckDbConnection};
use tracing::debug;

use crate::config::DECKS_TABLE;
use crate::error::{DeckError, Result};
use crate::models::Card;

/// Where a [`Connection`] keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreLocation::File(path) => write!(f, "{}", path.display()),
            StoreLocation::InMemory => f.write_str(":memory:"),
        }
    }
}

/// Wraps a DuckDB connection and exposes typed deck row access.
pub struct Connection {
    conn: DuckDbConnection,
    location: StoreLocation,
}

impl Connection {
    /// Open (or create) a file-backed store at `path`.
    ///
    /// Parent directories are created if missing, and the `decks` table is
    /// created on first open.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = DuckDbConnection::open(path)?;
        Self::init(conn, StoreLocation::File(path.to_path_buf()))
    }

    /// Open a store that lives only as long as this connection.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Self::init(conn, StoreLocation::InMemory)
    }

    fn init(conn: DuckDbConnection, location: StoreLocation) -> Result<Self> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {DECKS_TABLE} (\
                id VARCHAR PRIMARY KEY, \
                cards VARCHAR NOT NULL\
             )"
        ))?;
        debug!(%location, "opened deck store");
        Ok(Self { conn, location })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Insert a new deck row. Fails with `DuplicateKey` if `id` is taken.
    pub fn create(&mut self, id: &str, cards: &[Card]) -> Result<()> {
        let payload = serde_json::to_string(cards)?;
        let tx = self.conn.transaction()?;
        if load_cards(&tx, id)?.is_some() {
            return Err(DeckError::DuplicateKey(id.to_string()));
        }
        tx.execute(
            &format!("INSERT INTO {DECKS_TABLE} (id, cards) VALUES (?, ?)"),
            params![id, payload],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Return the stored card sequence for `id`, in order.
    pub fn read(&self, id: &str) -> Result<Vec<Card>> {
        load_cards(&self.conn, id)?.ok_or_else(|| deck_not_found(id))
    }

    /// Replace the stored card sequence for `id`.
    pub fn write(&mut self, id: &str, cards: &[Card]) -> Result<()> {
        let tx = self.conn.transaction()?;
        store_cards(&tx, id, cards)?;
        tx.commit()?;
        Ok(())
    }

    /// Read, mutate and write back the cards of one deck as a single
    /// transaction.
    ///
    /// `mutate` receives the current sequence and returns the cards it took
    /// out of it (if any). When `mutate` fails, the transaction is rolled back
    /// and the stored deck is left untouched.
    ///
    /// Returns the new card count and the taken cards.
    pub fn update<F>(&mut self, id: &str, mutate: F) -> Result<(usize, Vec<Card>)>
    where
        F: FnOnce(&mut Vec<Card>) -> Result<Vec<Card>>,
    {
        let tx = self.conn.transaction()?;
        let mut cards = load_cards(&tx, id)?.ok_or_else(|| deck_not_found(id))?;
        let taken = mutate(&mut cards)?;
        store_cards(&tx, id, &cards)?;
        tx.commit()?;
        Ok((cards.len(), taken))
    }

    /// Number of stored decks.
    pub fn count(&self) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT COUNT(*) FROM {DECKS_TABLE}"))?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => {
                let n: i64 = row.get(0)?;
                usize::try_from(n).map_err(|_| DeckError::Storage(format!("bad row count {n}")))
            }
            None => Ok(0),
        }
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn deck_not_found(id: &str) -> DeckError {
    DeckError::NotFound(format!("No deck with id '{id}'"))
}

/// Fetch and decode the card column of one row, `None` if the row is absent.
fn load_cards(conn: &DuckDbConnection, id: &str) -> Result<Option<Vec<Card>>> {
    let mut stmt = conn.prepare(&format!("SELECT cards FROM {DECKS_TABLE} WHERE id = ?"))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(row) => {
            let payload: String = row.get(0)?;
            Ok(Some(serde_json::from_str(&payload)?))
        }
        None => Ok(None),
    }
}

fn store_cards(conn: &DuckDbConnection, id: &str, cards: &[Card]) -> Result<()> {
    let payload = serde_json::to_string(cards)?;
    let changed = conn.execute(
        &format!("UPDATE {DECKS_TABLE} SET cards = ? WHERE id = ?"),
        params![payload, id],
    )?;
    if changed == 0 {
        return Err(deck_not_found(id));
    }
    Ok(())
}
