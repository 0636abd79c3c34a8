use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use prime_common::{ListingPatch, NewListing, PhoneListing};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::models::{MirrorRecord, now_millis};

/// Async-safe handle to the inventory database.
///
/// Wraps `InventoryDb` behind `Arc<Mutex>` and runs all access on tokio's
/// blocking thread pool via `spawn_blocking`, keeping synchronous SQLite
/// I/O off the async worker threads.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<std::sync::Mutex<InventoryDb>>,
}

impl DbHandle {
    pub fn new(db: InventoryDb) -> Self {
        Self {
            inner: Arc::new(std::sync::Mutex::new(db)),
        }
    }

    /// Run a closure with access to the database on a blocking thread.
    /// All data passed into `f` must be owned (`'static`).
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&InventoryDb) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = db.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
            f(&guard)
        })
        .await
        .context("DB task panicked")?
    }

    /// Acquire the database mutex synchronously. Only for startup and tests;
    /// never from a hot async path.
    pub fn lock_sync(&self) -> Result<std::sync::MutexGuard<'_, InventoryDb>> {
        self.inner
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))
    }
}

const LISTING_COLUMNS: &str = "id, phone_number, price, postpaid_only, sold, created_at";

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<PhoneListing> {
    Ok(PhoneListing {
        id: row.get(0)?,
        phone_number: row.get(1)?,
        price: row.get(2)?,
        postpaid_only: row.get(3)?,
        sold: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn mirror_from_row(row: &Row<'_>) -> rusqlite::Result<MirrorRecord> {
    Ok(MirrorRecord {
        id: row.get(0)?,
        mirror_number: row.get(1)?,
        created_at: row.get(2)?,
    })
}

pub struct InventoryDb {
    conn: Connection,
}

impl InventoryDb {
    /// Open (or create) a SQLite database at the given path and run migrations.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database at {}", path.display()))?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Create an in-memory SQLite database (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        self.conn
            .busy_timeout(std::time::Duration::from_secs(5))
            .context("Failed to set SQLite busy timeout")?;
        self.run_migrations().context("Failed to run migrations")?;
        Ok(())
    }

    fn run_migrations(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS phone_numbers (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    phone_number TEXT NOT NULL,
                    price REAL NOT NULL,
                    postpaid_only INTEGER NOT NULL DEFAULT 0,
                    sold INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS mirror_numbers (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    mirror_number TEXT NOT NULL UNIQUE,
                    created_at INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_phone_numbers_created ON phone_numbers(created_at);
                CREATE INDEX IF NOT EXISTS idx_mirror_numbers_created ON mirror_numbers(created_at);
                ",
            )
            .context("Failed to create tables")?;
        Ok(())
    }

    // ── Phone listings ────────────────────────────────────────────────

    pub fn create_listing(&self, new: &NewListing) -> Result<PhoneListing> {
        self.create_listing_at(new, now_millis())
    }

    pub fn create_listing_at(&self, new: &NewListing, created_at: i64) -> Result<PhoneListing> {
        self.conn
            .execute(
                "INSERT INTO phone_numbers (phone_number, price, postpaid_only, sold, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![new.phone_number, new.price, new.postpaid_only, new.sold, created_at],
            )
            .context("Failed to insert phone number")?;
        let id = self.conn.last_insert_rowid();
        self.get_listing(id)?
            .context("Phone number not found after insert")
    }

    /// All listings in insertion order; callers sort with a `ListingQuery`.
    pub fn list_listings(&self) -> Result<Vec<PhoneListing>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM phone_numbers ORDER BY id", LISTING_COLUMNS))
            .context("Failed to prepare list_listings")?;
        let rows = stmt
            .query_map([], listing_from_row)
            .context("Failed to query phone numbers")?;
        let mut listings = Vec::new();
        for row in rows {
            listings.push(row.context("Failed to read phone number row")?);
        }
        Ok(listings)
    }

    pub fn get_listing(&self, id: i64) -> Result<Option<PhoneListing>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM phone_numbers WHERE id = ?1", LISTING_COLUMNS),
                params![id],
                listing_from_row,
            )
            .optional()
            .context("Failed to query phone number")
    }

    /// Apply a patch; `None` if the listing doesn't exist.
    pub fn update_listing(&self, id: i64, patch: &ListingPatch) -> Result<Option<PhoneListing>> {
        let Some(mut listing) = self.get_listing(id)? else {
            return Ok(None);
        };
        patch.apply_to(&mut listing);
        self.conn
            .execute(
                "UPDATE phone_numbers SET phone_number = ?1, price = ?2, postpaid_only = ?3, sold = ?4
                 WHERE id = ?5",
                params![
                    listing.phone_number,
                    listing.price,
                    listing.postpaid_only,
                    listing.sold,
                    id
                ],
            )
            .context("Failed to update phone number")?;
        Ok(Some(listing))
    }

    pub fn delete_listing(&self, id: i64) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM phone_numbers WHERE id = ?1", params![id])
            .context("Failed to delete phone number")?;
        Ok(count > 0)
    }

    // ── Mirror numbers ────────────────────────────────────────────────

    /// Every mirror number handed out so far.
    pub fn mirror_codes(&self) -> Result<HashSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT mirror_number FROM mirror_numbers")
            .context("Failed to prepare mirror_codes")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("Failed to query mirror numbers")?;
        let mut codes = HashSet::new();
        for row in rows {
            codes.insert(row.context("Failed to read mirror number row")?);
        }
        Ok(codes)
    }

    /// Record a mirror number. Returns `None` when the number is already
    /// taken; the unique index makes this safe against other writers.
    pub fn insert_mirror_number(&self, code: &str, created_at: i64) -> Result<Option<MirrorRecord>> {
        let inserted = self
            .conn
            .execute(
                "INSERT INTO mirror_numbers (mirror_number, created_at) VALUES (?1, ?2)
                 ON CONFLICT(mirror_number) DO NOTHING",
                params![code, created_at],
            )
            .context("Failed to insert mirror number")?;
        if inserted == 0 {
            return Ok(None);
        }
        let id = self.conn.last_insert_rowid();
        Ok(Some(MirrorRecord {
            id,
            mirror_number: code.to_string(),
            created_at,
        }))
    }

    /// History, newest first.
    pub fn list_mirror_numbers(&self) -> Result<Vec<MirrorRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, mirror_number, created_at FROM mirror_numbers
                 ORDER BY created_at DESC, id DESC",
            )
            .context("Failed to prepare list_mirror_numbers")?;
        let rows = stmt
            .query_map([], mirror_from_row)
            .context("Failed to query mirror numbers")?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row.context("Failed to read mirror number row")?);
        }
        Ok(records)
    }
}
