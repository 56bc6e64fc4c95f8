//! SQLite-backed key record store.

use crate::error::{StoreError, StoreResult};
use crate::{KeyStore, NewKeyRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pawvault_types::{KeyRecord, PrincipalId};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// Key record store backed by SQLite.
///
/// The `principal_id` primary key provides the unique-index enforcement the
/// rest of the system relies on: two racing inserts for the same principal
/// resolve to one success and one [`StoreError::DuplicatePrincipal`].
pub struct SqliteKeyStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS key_records (
                principal_id TEXT PRIMARY KEY,
                public_key TEXT NOT NULL,
                private_key TEXT NOT NULL,
                key_strength INTEGER NOT NULL DEFAULT 2048,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn find_blocking(&self, principal: &PrincipalId) -> StoreResult<Option<KeyRecord>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT principal_id, public_key, private_key, key_strength, created_at, updated_at
                 FROM key_records WHERE principal_id = ?1",
                params![principal.as_str()],
                row_to_tuple,
            )
            .optional()?;

        row.map(tuple_to_record).transpose()
    }

    fn exists_blocking(&self, principal: &PrincipalId) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM key_records WHERE principal_id = ?1",
                params![principal.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert_blocking(&self, record: NewKeyRecord) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        let result = conn.execute(
            "INSERT INTO key_records (principal_id, public_key, private_key, key_strength, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.principal_id.as_str(),
                record.public_key,
                record.private_key,
                record.key_strength,
                now,
                now,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicatePrincipal(record.principal_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn remove_blocking(&self, principal: &PrincipalId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM key_records WHERE principal_id = ?1",
            params![principal.as_str()],
        )?;
        Ok(())
    }

    fn list_all_blocking(&self) -> StoreResult<Vec<KeyRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT principal_id, public_key, private_key, key_strength, created_at, updated_at
             FROM key_records ORDER BY principal_id",
        )?;
        let rows = stmt.query_map([], row_to_tuple)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(tuple_to_record(row?)?);
        }
        Ok(records)
    }
}

type RecordTuple = (String, String, String, u32, String, String);

fn row_to_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordTuple> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn tuple_to_record(t: RecordTuple) -> StoreResult<KeyRecord> {
    let (principal_id, public_key, private_key, key_strength, created_at, updated_at) = t;
    Ok(KeyRecord {
        principal_id: PrincipalId::new(principal_id),
        public_key,
        private_key,
        key_strength,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("bad timestamp `{raw}`: {e}")))
}

#[async_trait]
impl KeyStore for SqliteKeyStore {
    async fn find_by_principal(&self, principal: &PrincipalId) -> StoreResult<Option<KeyRecord>> {
        self.find_blocking(principal)
    }

    async fn exists(&self, principal: &PrincipalId) -> StoreResult<bool> {
        self.exists_blocking(principal)
    }

    async fn insert(&self, record: NewKeyRecord) -> StoreResult<()> {
        self.insert_blocking(record)
    }

    async fn remove(&self, principal: &PrincipalId) -> StoreResult<()> {
        self.remove_blocking(principal)
    }

    async fn list_all(&self) -> StoreResult<Vec<KeyRecord>> {
        self.list_all_blocking()
    }
}
