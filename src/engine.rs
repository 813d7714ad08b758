//! Single-writer command engine in front of the deck store.
//!
//! Callers on any task [`submit`](Engine::submit) a [`Command`] and await its
//! [`Reply`]. Commands travel through one bounded queue to a dedicated worker
//! thread that owns the [`Connection`] and runs them strictly one at a time in
//! queue order. Each caller gets its own completion handle, so independent
//! requests can wait in parallel while the store sees a single writer.
//!
//! Multi-step changes to one deck go through [`Command::Update`], which reads,
//! mutates and writes the deck inside one worker slot and one transaction. A
//! separate `Read` followed by a `Write` is two commands and is not atomic.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::connection::{Connection, StoreLocation};
use crate::error::{DeckError, Result};
use crate::models::Card;

const WORKER_THREAD_NAME: &str = "deck-store-worker";

/// Change applied to a deck's cards by [`Command::Update`].
///
/// Returns the cards taken out of the deck, if any. An error aborts the update
/// and leaves the stored deck unchanged.
pub type Mutation = Box<dyn FnOnce(&mut Vec<Card>) -> Result<Vec<Card>> + Send + 'static>;

// ---------------------------------------------------------------------------
// Command / Reply
// ---------------------------------------------------------------------------

pub enum Command {
    /// Insert a new deck row.
    Create { id: String, cards: Vec<Card> },
    /// Fetch a deck's cards.
    Read { id: String },
    /// Replace a deck's cards.
    Write { id: String, cards: Vec<Card> },
    /// Read, mutate and write a deck as one unit.
    Update { id: String, mutation: Mutation },
    /// Count stored decks.
    Count,
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Read { .. } => "read",
            Command::Write { .. } => "write",
            Command::Update { .. } => "update",
            Command::Count => "count",
        }
    }

    pub fn deck_id(&self) -> Option<&str> {
        match self {
            Command::Create { id, .. }
            | Command::Read { id }
            | Command::Write { id, .. }
            | Command::Update { id, .. } => Some(id),
            Command::Count => None,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("kind", &self.kind())
            .field("deck_id", &self.deck_id())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Created,
    Cards(Vec<Card>),
    Written,
    Updated { remaining: usize, taken: Vec<Card> },
    Count(usize),
}

enum Message {
    Run {
        command: Command,
        reply: oneshot::Sender<Result<Reply>>,
    },
    Shutdown,
}

// ---------------------------------------------------------------------------
// EngineOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub location: StoreLocation,
    /// Bounded wait for each reply. `None` waits forever.
    pub command_timeout: Option<Duration>,
    pub queue_capacity: usize,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Cloneable handle used to submit commands to the store worker.
#[derive(Clone)]
pub struct Engine {
    tx: mpsc::Sender<Message>,
    timeout: Option<Duration>,
}

impl Engine {
    /// Open the store on a new worker thread and return a handle to it.
    ///
    /// The store is opened on the worker itself, so this returns only after
    /// the open has succeeded or failed. An open failure is returned here and
    /// no worker is left running.
    pub fn start(options: EngineOptions) -> Result<(Engine, JoinHandle<()>)> {
        let (tx, rx) = mpsc::channel(options.queue_capacity.max(1));
        let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel(1);
        let location = options.location.clone();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || {
                let opened = match &location {
                    StoreLocation::File(path) => Connection::open(path),
                    StoreLocation::InMemory => Connection::open_in_memory(),
                };
                match opened {
                    Ok(conn) => {
                        let _ = ready_tx.send(Ok(()));
                        run_worker(conn, rx);
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                    }
                }
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            Err(_) => {
                let _ = worker.join();
                return Err(DeckError::Storage(
                    "store worker exited before opening the store".into(),
                ));
            }
        }

        let engine = Engine {
            tx,
            timeout: options.command_timeout,
        };
        Ok((engine, worker))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Queue a command and wait for its result.
    ///
    /// With a timeout configured, fails with [`DeckError::Timeout`] if the
    /// command is not queued and answered in time. A command that already got
    /// a queue slot is not cancelled and still runs when its turn comes. One
    /// still waiting for a slot in a full queue is dropped and never runs.
    pub async fn submit(&self, command: Command) -> Result<Reply> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.dispatch(command))
                .await
                .map_err(|_| DeckError::Timeout(limit))?,
            None => self.dispatch(command).await,
        }
    }

    async fn dispatch(&self, command: Command) -> Result<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Message::Run {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| DeckError::EngineClosed)?;
        reply_rx.await.map_err(|_| DeckError::EngineClosed)?
    }

    /// Ask the worker to stop once every command queued so far has run.
    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(Message::Shutdown)
            .await
            .map_err(|_| DeckError::EngineClosed)
    }

    // -- Typed helpers ------------------------------------------------------

    pub async fn create(&self, id: impl Into<String>, cards: Vec<Card>) -> Result<()> {
        match self.submit(Command::Create { id: id.into(), cards }).await? {
            Reply::Created => Ok(()),
            other => Err(unexpected("create", other)),
        }
    }

    pub async fn read(&self, id: impl Into<String>) -> Result<Vec<Card>> {
        match self.submit(Command::Read { id: id.into() }).await? {
            Reply::Cards(cards) => Ok(cards),
            other => Err(unexpected("read", other)),
        }
    }

    pub async fn write(&self, id: impl Into<String>, cards: Vec<Card>) -> Result<()> {
        match self.submit(Command::Write { id: id.into(), cards }).await? {
            Reply::Written => Ok(()),
            other => Err(unexpected("write", other)),
        }
    }

    /// Apply `mutation` to one deck atomically.
    ///
    /// Returns the deck's new card count and the cards the mutation took out.
    pub async fn update<F>(&self, id: impl Into<String>, mutation: F) -> Result<(usize, Vec<Card>)>
    where
        F: FnOnce(&mut Vec<Card>) -> Result<Vec<Card>> + Send + 'static,
    {
        let command = Command::Update {
            id: id.into(),
            mutation: Box::new(mutation),
        };
        match self.submit(command).await? {
            Reply::Updated { remaining, taken } => Ok((remaining, taken)),
            other => Err(unexpected("update", other)),
        }
    }

    pub async fn deck_count(&self) -> Result<usize> {
        match self.submit(Command::Count).await? {
            Reply::Count(n) => Ok(n),
            other => Err(unexpected("count", other)),
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("timeout", &self.timeout)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

fn unexpected(kind: &str, reply: Reply) -> DeckError {
    DeckError::Storage(format!("unexpected reply to {kind}: {reply:?}"))
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

fn run_worker(mut conn: Connection, mut rx: mpsc::Receiver<Message>) {
    info!(location = %conn.location(), "deck store worker started");

    while let Some(message) = rx.blocking_recv() {
        let (command, reply) = match message {
            Message::Run { command, reply } => (command, reply),
            Message::Shutdown => break,
        };

        let kind = command.kind();
        let deck_id = command.deck_id().map(str::to_owned);
        debug!(command = kind, deck_id = ?deck_id, "executing command");

        let result = panic::catch_unwind(AssertUnwindSafe(|| execute(&mut conn, command)))
            .unwrap_or_else(|_| Err(DeckError::Storage(format!("{kind} command panicked"))));

        if let Err(e) = &result {
            warn!(command = kind, deck_id = ?deck_id, error = %e, "command failed");
        }
        if reply.send(result).is_err() {
            debug!(command = kind, deck_id = ?deck_id, "caller went away before reply");
        }
    }

    // Anything still queued is dropped here; those callers see EngineClosed.
    rx.close();
    info!("deck store worker stopped");
}

fn execute(conn: &mut Connection, command: Command) -> Result<Reply> {
    match command {
        Command::Create { id, cards } => {
            conn.create(&id, &cards)?;
            Ok(Reply::Created)
        }
        Command::Read { id } => Ok(Reply::Cards(conn.read(&id)?)),
        Command::Write { id, cards } => {
            conn.write(&id, &cards)?;
            Ok(Reply::Written)
        }
        Command::Update { id, mutation } => {
            let (remaining, taken) = conn.update(&id, mutation)?;
            Ok(Reply::Updated { remaining, taken })
        }
        Command::Count => Ok(Reply::Count(conn.count()?)),
    }
}
