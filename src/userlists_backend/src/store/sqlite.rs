//! SQLite-backed user store.
//!
//! Tables:
//! - `users`: id, username (unique), password_hash
//! - `list_items`: user_id, list, item; one row per (user, list, item), ordered by `seq`

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Params};

use super::{StoreError, UserStore};
use crate::models::{ListKind, User};

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS list_items (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        list TEXT NOT NULL,
        item TEXT NOT NULL,
        UNIQUE (user_id, list, item)
    );";

const SELECT_BY_ID: &str = "SELECT id, username, password_hash FROM users WHERE id = ?1";
const SELECT_BY_NAME: &str = "SELECT id, username, password_hash FROM users WHERE username = ?1";

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`. `:memory:` gives a private in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;

        // WAL mode for concurrent reads + crash safety
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

        log::info!("Opened user store at {}", path.as_ref().display());
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn load_list(conn: &Connection, user_id: i64, kind: ListKind) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT item FROM list_items WHERE user_id = ?1 AND list = ?2 ORDER BY seq",
    )?;
    let items = stmt
        .query_map(params![user_id, kind.as_str()], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(items)
}

fn load_user<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Option<User>, StoreError> {
    let row = conn
        .query_row(sql, params, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .optional()?;

    let Some((id, username, password_hash)) = row else {
        return Ok(None);
    };

    Ok(Some(User {
        id: id as u64,
        username,
        password_hash,
        favourites: load_list(conn, id, ListKind::Favourites)?,
        history: load_list(conn, id, ListKind::History)?,
    }))
}

/// Resolve `id` to a row id, failing with `NotFound` if no such user exists.
fn require_user(conn: &Connection, id: u64) -> Result<i64, StoreError> {
    let row_id = i64::try_from(id).map_err(|_| StoreError::NotFound(id))?;
    conn.query_row("SELECT id FROM users WHERE id = ?1", [row_id], |row| row.get(0))
        .optional()?
        .ok_or(StoreError::NotFound(id))
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let username = username.to_string();
        let password_hash = password_hash.to_string();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
                params![username, password_hash],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateUsername(username.clone())
                } else {
                    StoreError::from(e)
                }
            })?;

            let id = conn.last_insert_rowid() as u64;
            Ok(User::new(id, username, password_hash))
        })
        .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.to_string();
        self.with_conn(move |conn| load_user(conn, SELECT_BY_NAME, params![username]))
            .await
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<User>, StoreError> {
        let Ok(row_id) = i64::try_from(id) else {
            return Ok(None);
        };
        self.with_conn(move |conn| load_user(conn, SELECT_BY_ID, [row_id]))
            .await
    }

    async fn add_to_list(
        &self,
        id: u64,
        kind: ListKind,
        item: &str,
    ) -> Result<Vec<String>, StoreError> {
        let item = item.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let user_id = require_user(&tx, id)?;
            tx.execute(
                "INSERT OR IGNORE INTO list_items (user_id, list, item) VALUES (?1, ?2, ?3)",
                params![user_id, kind.as_str(), item],
            )?;
            let list = load_list(&tx, user_id, kind)?;
            tx.commit()?;
            Ok(list)
        })
        .await
    }

    async fn remove_from_list(
        &self,
        id: u64,
        kind: ListKind,
        item: &str,
    ) -> Result<Vec<String>, StoreError> {
        let item = item.to_string();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let user_id = require_user(&tx, id)?;
            tx.execute(
                "DELETE FROM list_items WHERE user_id = ?1 AND list = ?2 AND item = ?3",
                params![user_id, kind.as_str(), item],
            )?;
            let list = load_list(&tx, user_id, kind)?;
            tx.commit()?;
            Ok(list)
        })
        .await
    }
}
