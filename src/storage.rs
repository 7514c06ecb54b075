//! The persistence gateway: keyed storage of whole board documents.
//!
//! One `SQLite` file holds one row per operator identity:
//!
//! ```text
//! board (identity TEXT PRIMARY KEY, document TEXT, saved_at TEXT)
//! ```
//!
//! Sessions coordinate exclusively through these rows, so writes are
//! last-one-wins at whole-document granularity. Documents written
//! before identity scoping existed live in the empty-identity row;
//! reads fall back to it, writes never do — migrating a legacy document
//! under an identity takes an explicit persist.

use std::io;
use std::path::{Path, PathBuf};

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension};

use crate::model::BoardDocument;
use crate::rotation::DocumentSource;

/// Row key for the pre-identity legacy document.
const LEGACY_KEY: &str = "";

/// Errors that can occur while persisting a document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// `SQLite`-backed document store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens the store at the given path, creating the file, its parent
    /// directory, and the schema as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS board (
                 identity  TEXT PRIMARY KEY,
                 document  TEXT NOT NULL,
                 saved_at  TEXT NOT NULL
             )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// The default store path: `~/.moorings/board.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".moorings").join("board.sqlite"))
    }

    /// Loads the document for an identity.
    ///
    /// A missing identity row falls back, read-only, to the legacy
    /// unscoped row. Missing and unparsable documents both load as the
    /// default document; a display must come up even when the store is
    /// empty or damaged.
    pub fn load(&self, identity: Option<&str>) -> BoardDocument {
        let key = identity.unwrap_or(LEGACY_KEY);
        match self.row(key) {
            Ok(Some(json)) => parse_document(&json),
            Ok(None) if identity.is_some() => match self.row(LEGACY_KEY) {
                Ok(Some(json)) => parse_document(&json),
                _ => BoardDocument::default(),
            },
            _ => BoardDocument::default(),
        }
    }

    /// Stores the document under an identity, stamping its generation.
    ///
    /// On failure the in-memory document is untouched — it was passed
    /// by reference and never mutated — so the caller surfaces a notice
    /// and the operator retries.
    pub fn save(&self, identity: &str, doc: &BoardDocument, now: Timestamp) -> Result<()> {
        let mut stamped = doc.clone();
        stamped.generation = Some(now);
        let json = serde_json::to_string(&stamped)?;
        self.conn.execute(
            "INSERT INTO board (identity, document, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(identity) DO UPDATE
             SET document = excluded.document, saved_at = excluded.saved_at",
            rusqlite::params![identity, json, now.to_string()],
        )?;
        Ok(())
    }

    fn row(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT document FROM board WHERE identity = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?)
    }
}

/// Parses a stored document, falling back to defaults on corrupt JSON.
fn parse_document(json: &str) -> BoardDocument {
    serde_json::from_str(json).unwrap_or_default()
}

impl DocumentSource for Store {
    fn fetch(&self, identity: Option<&str>) -> BoardDocument {
        self.load(identity)
    }
}
