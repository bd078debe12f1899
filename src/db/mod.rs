use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use rusqlite::Connection;

pub mod models;

mod assets;
mod audits;
mod controls;
mod incidents;
mod risks;
mod stats;

pub use stats::DashboardStats;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Embedded governance record store.
///
/// Holds only the database path: every operation opens its own
/// connection, runs its statements, and commits. There is no held write
/// lock between a read and a later write, and no isolation beyond
/// SQLite's per-statement default. Foreign keys are declared in the DDL
/// but not enforced (`PRAGMA foreign_keys` stays off), so a risk's asset
/// reference may dangle after the asset is deleted.
pub struct GovernanceDb {
    db_path: PathBuf,
}

impl GovernanceDb {
    /// Open the store at the given file path, creating the parent
    /// directory and applying the idempotent schema DDL.
    pub fn open(db_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create data directory")?;
            }
        }

        let db = Self { db_path };

        let conn = db.connection()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set WAL mode")?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to apply schema")?;

        log::info!("Governance database initialized at {:?}", db.db_path);

        Ok(db)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.db_path
    }

    pub(crate) fn connection(&self) -> anyhow::Result<Connection> {
        let conn =
            Connection::open(&self.db_path).context("Failed to open governance database")?;
        // Foreign keys are declared in the DDL but intentionally not enforced
        // (see the type-level docs). The bundled SQLite is compiled with
        // SQLITE_DEFAULT_FOREIGN_KEYS=1, so enforcement must be explicitly
        // disabled per connection to keep `PRAGMA foreign_keys` off.
        conn.execute_batch("PRAGMA foreign_keys=OFF;")
            .context("Failed to disable foreign key enforcement")?;
        Ok(conn)
    }
}

/// Insert/update timestamp, microsecond precision so successive updates
/// compare strictly.
pub(crate) fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Default value for review/incident/audit date columns.
pub(crate) fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
pub(crate) fn test_db() -> (tempfile::TempDir, GovernanceDb) {
    let dir = tempfile::tempdir().unwrap();
    let db = GovernanceDb::open(dir.path().join("govledger.db")).unwrap();
    (dir, db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("govledger.db");

        let db = GovernanceDb::open(&path).unwrap();
        let id = db
            .add_asset(&models::NewAsset {
                name: "Survivor".into(),
                asset_type: "ML Model".into(),
                ..Default::default()
            })
            .unwrap();

        // Re-opening must not recreate tables or lose rows.
        let db = GovernanceDb::open(&path).unwrap();
        let assets = db.get_assets().unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].id, id);
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("govledger.db");
        GovernanceDb::open(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn timestamps_are_sortable_text() {
        let a = now_timestamp();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = now_timestamp();
        assert!(b > a);
        assert_eq!(today().len(), 10);
    }
}
