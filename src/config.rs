use std::path::PathBuf;
use std::time::Duration;

/// Name of the single durable table: deck id -> JSON card array.
pub const DECKS_TABLE: &str = "decks";

pub const DEFAULT_DB_FILE: &str = "decks.duckdb";

/// Route prefix under which card images are served.
pub const IMAGE_ROUTE: &str = "/static";

pub const STANDARD_DECK_SIZE: usize = 52;

/// How long a caller waits for its command reply before giving up.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Commands that may wait in the engine queue before submitters are held back.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("deck-service")
    } else {
        PathBuf::from(".deck-service")
    }
}

pub fn default_db_path() -> PathBuf {
    default_data_dir().join(DEFAULT_DB_FILE)
}
