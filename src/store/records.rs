// Record types and query helpers for the four collections.
//
// quotes and settings are singletons keyed by "main"; put is a whole-document
// upsert (last write wins per key). Image records are insert-once and deleted
// by id.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

use crate::constants::SINGLETON_ID;
use crate::error::Result;
use crate::settings::Settings;

// ----- Quote document (singleton) -----

/// Newline-delimited quote list. Blank lines are not valid quotes; they are
/// filtered when the pool is derived, not on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteDocument {
    pub id: String,
    pub text: String,
}

impl QuoteDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: SINGLETON_ID.to_string(),
            text: text.into(),
        }
    }
}

pub fn get_quote_document(conn: &Connection) -> Result<Option<QuoteDocument>> {
    let result = conn
        .query_row(
            "SELECT id, text FROM quotes WHERE id = ?1",
            params![SINGLETON_ID],
            |row| {
                Ok(QuoteDocument {
                    id: row.get(0)?,
                    text: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(result)
}

pub fn put_quote_document(conn: &Connection, doc: &QuoteDocument) -> Result<()> {
    conn.execute(
        "INSERT INTO quotes (id, text) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET text = excluded.text",
        params![doc.id, doc.text],
    )?;
    Ok(())
}

// ----- Settings document (singleton) -----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    pub id: String,
    pub config: Settings,
}

/// Read the settings document. An unreadable config payload is treated the
/// same as an absent document: callers fall back to defaults.
pub fn get_settings_document(conn: &Connection) -> Result<Option<SettingsDocument>> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT id, config FROM settings WHERE id = ?1",
            params![SINGLETON_ID],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(row.and_then(|(id, raw)| {
        serde_json::from_str::<Settings>(&raw)
            .ok()
            .map(|config| SettingsDocument { id, config })
    }))
}

pub fn put_settings_document(conn: &Connection, doc: &SettingsDocument) -> Result<()> {
    let raw = serde_json::to_string(&doc.config)?;
    conn.execute(
        "INSERT INTO settings (id, config) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET config = excluded.config",
        params![doc.id, raw],
    )?;
    Ok(())
}

// ----- Image records (two collections) -----

/// Which image collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCollection {
    Background,
    Displayed,
}

impl ImageCollection {
    pub fn table(self) -> &'static str {
        match self {
            ImageCollection::Background => "images",
            ImageCollection::Displayed => "displayed_images",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub data_url: String,
}

pub fn insert_image(conn: &Connection, collection: ImageCollection, record: &ImageRecord) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} (id, data_url) VALUES (?1, ?2)",
            collection.table()
        ),
        params![record.id, record.data_url],
    )?;
    Ok(())
}

pub fn get_image(conn: &Connection, collection: ImageCollection, id: &str) -> Result<Option<ImageRecord>> {
    let result = conn
        .query_row(
            &format!("SELECT id, data_url FROM {} WHERE id = ?1", collection.table()),
            params![id],
            |row| {
                Ok(ImageRecord {
                    id: row.get(0)?,
                    data_url: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(result)
}

/// All records in a collection. Order is insertion order (id ascending) but
/// callers must not rely on it.
pub fn list_images(conn: &Connection, collection: ImageCollection) -> Result<Vec<ImageRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, data_url FROM {} ORDER BY id",
        collection.table()
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(ImageRecord {
            id: row.get(0)?,
            data_url: row.get(1)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

pub fn delete_image(conn: &Connection, collection: ImageCollection, id: &str) -> Result<()> {
    conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", collection.table()),
        params![id],
    )?;
    Ok(())
}

// ----- Id generation -----

/// Generate a fresh time-based record id (millisecond timestamp, rendered as
/// a decimal string). Strictly increasing even when two inserts land in the
/// same millisecond, so ids never collide within a store.
pub fn next_record_id() -> String {
    static LAST_ID: AtomicI64 = AtomicI64::new(0);

    let now = chrono::Utc::now().timestamp_millis();
    let mut prev = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_ID.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => prev = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Mode;
    use crate::store::open_store;

    fn test_conn() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_store(&dir.path().join("tabnook.db")).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_quote_document_round_trip() {
        let (_dir, conn) = test_conn();

        assert!(get_quote_document(&conn).unwrap().is_none());

        let doc = QuoteDocument::new("first\nsecond");
        put_quote_document(&conn, &doc).unwrap();
        assert_eq!(get_quote_document(&conn).unwrap(), Some(doc));
    }

    #[test]
    fn test_quote_document_upsert_overwrites() {
        let (_dir, conn) = test_conn();

        put_quote_document(&conn, &QuoteDocument::new("old")).unwrap();
        put_quote_document(&conn, &QuoteDocument::new("new")).unwrap();

        let doc = get_quote_document(&conn).unwrap().unwrap();
        assert_eq!(doc.text, "new");
    }

    #[test]
    fn test_settings_document_round_trip() {
        let (_dir, conn) = test_conn();

        assert!(get_settings_document(&conn).unwrap().is_none());

        let doc = SettingsDocument {
            id: SINGLETON_ID.to_string(),
            config: Settings {
                background_mode: Mode::Daily,
                displayed_mode: Mode::Random,
                quotes_mode: Mode::Daily,
            },
        };
        put_settings_document(&conn, &doc).unwrap();
        assert_eq!(get_settings_document(&conn).unwrap(), Some(doc));
    }

    #[test]
    fn test_settings_unreadable_config_reads_as_absent() {
        let (_dir, conn) = test_conn();

        conn.execute(
            "INSERT INTO settings (id, config) VALUES ('main', 'not json')",
            [],
        )
        .unwrap();

        assert!(get_settings_document(&conn).unwrap().is_none());
    }

    #[test]
    fn test_image_collections_are_independent() {
        let (_dir, conn) = test_conn();

        let bg = ImageRecord {
            id: next_record_id(),
            data_url: "data:image/png;base64,AAAA".to_string(),
        };
        insert_image(&conn, ImageCollection::Background, &bg).unwrap();

        assert_eq!(
            get_image(&conn, ImageCollection::Background, &bg.id).unwrap(),
            Some(bg.clone())
        );
        assert!(get_image(&conn, ImageCollection::Displayed, &bg.id)
            .unwrap()
            .is_none());
        assert!(list_images(&conn, ImageCollection::Displayed)
            .unwrap()
            .is_empty());

        delete_image(&conn, ImageCollection::Background, &bg.id).unwrap();
        assert!(list_images(&conn, ImageCollection::Background)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_record_ids_unique_and_increasing() {
        let mut ids: Vec<i64> = (0..100)
            .map(|_| next_record_id().parse().unwrap())
            .collect();
        let original = ids.clone();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
        assert_eq!(ids, original, "ids should already be in increasing order");
    }
}
