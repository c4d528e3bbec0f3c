use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{RelayError, Result};
use crate::domain::DeliveryRecord;
use crate::store::DedupStore;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            RelayError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DeliveryRecord> {
        let seen_at: String = row.get(1)?;
        let seen_at = DateTime::parse_from_rfc3339(&seen_at)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DeliveryRecord {
            link: row.get(0)?,
            seen_at,
        })
    }
}

impl DedupStore for SqliteStore {
    fn exists(&self, link: &str) -> Result<bool> {
        let conn = self.conn()?;

        let found = conn
            .query_row(
                "SELECT 1 FROM delivered_items WHERE link = ?1",
                params![link],
                |_| Ok(()),
            )
            .optional()?;

        Ok(found.is_some())
    }

    fn add(&self, link: &str) -> Result<()> {
        let conn = self.conn()?;

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO delivered_items (link, seen_at) VALUES (?1, ?2)",
            params![link, Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)],
        )?;

        if inserted == 0 {
            return Err(RelayError::AlreadyRecorded(link.to_string()));
        }

        Ok(())
    }

    fn get(&self, link: &str) -> Result<Option<DeliveryRecord>> {
        let conn = self.conn()?;

        let record = conn
            .query_row(
                "SELECT link, seen_at FROM delivered_items WHERE link = ?1",
                params![link],
                Self::record_from_row,
            )
            .optional()?;

        Ok(record)
    }

    fn count(&self) -> Result<i64> {
        let conn = self.conn()?;

        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM delivered_items", [], |row| row.get(0))?;

        Ok(count)
    }

    fn recent(&self, limit: usize) -> Result<Vec<DeliveryRecord>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT link, seen_at FROM delivered_items
             ORDER BY seen_at DESC, rowid DESC LIMIT ?1",
        )?;

        let records = stmt
            .query_map(params![limit as i64], Self::record_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
