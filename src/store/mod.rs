// Record store module — local SQLite persistence.
// Four independent collections (quotes, images, displayed_images, settings),
// one table per collection, each keyed by a TEXT id. Absence of a key is a
// valid "not configured yet" state, never an error.

pub mod records;

use std::path::{Path, PathBuf};
use rusqlite::Connection;
use anyhow::Result;

use crate::constants::{DB_FILENAME, TABNOOK_FOLDER};

/// All store migrations in order. Each migration is a SQL string.
/// Uses PRAGMA user_version for version tracking.
const MIGRATIONS: &[&str] = &[
    // Migration 1: the four collections
    r#"
    CREATE TABLE IF NOT EXISTS quotes (
        id TEXT PRIMARY KEY NOT NULL,
        text TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS images (
        id TEXT PRIMARY KEY NOT NULL,
        data_url TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS displayed_images (
        id TEXT PRIMARY KEY NOT NULL,
        data_url TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS settings (
        id TEXT PRIMARY KEY NOT NULL,
        config TEXT NOT NULL
    );
    "#,
];

/// Default store path: ~/.tabnook/tabnook.db
pub fn default_store_path() -> Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.home_dir().join(TABNOOK_FOLDER).join(DB_FILENAME))
}

/// Open or create the store at the given path: create the parent directory,
/// open the database, set pragmas, run migrations.
pub fn open_store(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Cannot create store directory {}: {}. Check directory permissions.",
                parent.display(),
                e
            )
        })?;
    }

    let conn = Connection::open(db_path)?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    conn.execute_batch("PRAGMA busy_timeout=5000;")?;

    run_migrations(&conn)?;

    Ok(conn)
}

/// Get current store schema version
fn get_schema_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

/// Run all pending store migrations
fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    let target_version = MIGRATIONS.len() as u32;

    if current_version > target_version {
        anyhow::bail!(
            "Store schema version {} is newer than this build supports (max {}). Please upgrade tabnook.",
            current_version,
            target_version
        );
    }

    if current_version == target_version {
        return Ok(());
    }

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as u32;
        if migration_version <= current_version {
            continue;
        }

        conn.execute_batch(migration)?;
        conn.execute_batch(&format!("PRAGMA user_version = {}", migration_version))?;

        log::info!("Applied store migration {}", migration_version);
    }

    Ok(())
}
