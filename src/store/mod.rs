// Local persistent store
//
// SQLite database holding three tables:
// - device:   singleton row, this installation's identity
// - session:  singleton row, present while signed in
// - location: mirror of the remote location catalog
//
// Multi-row writes go through `transaction`, which commits on success and
// rolls back when the closure fails or the transaction is dropped.

pub mod device;
pub mod location;
pub mod session;

pub use device::Device;
pub use location::Location;
pub use session::Session;

use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::Result;

/// Handle to the local database. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self::init(conn)?;

        tracing::info!("Local store opened: {}", path.display());
        Ok(store)
    }

    /// Fresh database that lives only as long as this handle.
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch("PRAGMA busy_timeout=5000;")?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` in one transaction. Either everything `f` wrote is committed
    /// or nothing is.
    pub async fn transaction<T, F>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    async fn read<T, F>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.conn.lock().await;
        f(&conn)
    }

    // -- device ---------------------------------------------------------

    pub async fn get_device(&self) -> rusqlite::Result<Option<Device>> {
        self.read(device::get).await
    }

    pub async fn insert_device_if_absent(&self, d: &Device) -> rusqlite::Result<bool> {
        self.read(|conn| device::insert_if_absent(conn, d)).await
    }

    pub async fn update_device(&self, d: &Device) -> rusqlite::Result<()> {
        self.read(|conn| device::update(conn, d)).await
    }

    pub async fn delete_device(&self) -> rusqlite::Result<bool> {
        self.read(device::delete).await
    }

    // -- session --------------------------------------------------------

    pub async fn get_session(&self) -> rusqlite::Result<Option<Session>> {
        self.read(session::get).await
    }

    pub async fn delete_session(&self) -> rusqlite::Result<bool> {
        self.read(session::delete).await
    }

    /// Persist a successful registration: the session and the updated
    /// device land together or not at all.
    pub async fn save_registration(&self, s: &Session, d: &Device) -> rusqlite::Result<()> {
        self.transaction(|tx| {
            session::upsert(tx, s)?;
            device::update(tx, d)?;
            Ok(())
        })
        .await
    }

    /// Remove device and session in one transaction. Missing rows are fine.
    pub async fn clear_identity(&self) -> rusqlite::Result<()> {
        self.transaction(|tx| {
            let had_device = device::delete(tx)?;
            let had_session = session::delete(tx)?;
            tracing::debug!(had_device, had_session, "Cleared local identity");
            Ok(())
        })
        .await
    }

    // -- location -------------------------------------------------------

    pub async fn all_locations(&self) -> rusqlite::Result<Vec<Location>> {
        self.read(location::all).await
    }

    /// Make the local catalog mirror `fresh`, keeping last_access on rows
    /// that survive.
    pub async fn replace_catalog(&self, fresh: &[Location]) -> rusqlite::Result<()> {
        self.transaction(|tx| {
            let codes: Vec<&str> = fresh.iter().map(|l| l.code.as_str()).collect();
            let removed = location::delete_not_in(tx, &codes)?;
            let inserted = location::insert_ignore(tx, fresh)?;
            tracing::debug!(removed, inserted, total = fresh.len(), "Catalog diff applied");
            Ok(())
        })
        .await
    }

    pub async fn update_last_access(&self, code: &str, last_access: i64) -> rusqlite::Result<bool> {
        self.read(|conn| location::update_last_access(conn, code, last_access))
            .await
    }

    pub async fn recent_locations(&self, limit: usize) -> rusqlite::Result<Vec<Location>> {
        self.read(|conn| location::recent(conn, limit)).await
    }
}
