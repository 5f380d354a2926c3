// Pool editor — add/remove operations over the quote and image pools, as
// driven by the configuration surface.

use rusqlite::Connection;

use crate::constants::{PLACEHOLDER_BACKGROUND, PLACEHOLDER_DISPLAYED};
use crate::error::{Result, TabnookError};
use crate::store::records::{
    delete_image, insert_image, list_images, next_record_id, ImageCollection, ImageRecord,
};

/// Derive the quote pool from a quote document's text: one quote per line,
/// blank and whitespace-only lines dropped.
pub fn parse_quotes(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// In-memory quote list plus the newline-joined draft it is persisted as.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteDraft {
    quotes: Vec<String>,
}

impl QuoteDraft {
    pub fn from_text(text: &str) -> Self {
        Self {
            quotes: parse_quotes(text),
        }
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// The draft text to persist: quotes joined with newlines.
    pub fn text(&self) -> String {
        self.quotes.join("\n")
    }

    /// Append a trimmed, non-empty quote. Whitespace-only input is a no-op;
    /// returns whether anything was added.
    pub fn add(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.quotes.push(trimmed.to_string());
        true
    }

    /// Remove a quote by position.
    pub fn remove(&mut self, index: usize) -> Result<String> {
        if index >= self.quotes.len() {
            return Err(TabnookError::InvalidQuoteIndex(index));
        }
        Ok(self.quotes.remove(index))
    }
}

/// The editing surface only holds decoded payloads, so an empty collection
/// is presented as a single placeholder entry that is never persisted.
pub fn placeholder_for(collection: ImageCollection) -> &'static str {
    match collection {
        ImageCollection::Background => PLACEHOLDER_BACKGROUND,
        ImageCollection::Displayed => PLACEHOLDER_DISPLAYED,
    }
}

/// In-memory view of one image collection, as the editing surface holds it:
/// data URLs only, without the storage ids.
#[derive(Debug, Clone)]
pub struct ImagePool {
    collection: ImageCollection,
    entries: Vec<String>,
}

impl ImagePool {
    /// Load the pool from storage. An empty collection yields the
    /// collection's placeholder entry.
    pub fn load(conn: &Connection, collection: ImageCollection) -> Result<Self> {
        let mut entries: Vec<String> = list_images(conn, collection)?
            .into_iter()
            .map(|record| record.data_url)
            .collect();
        if entries.is_empty() {
            entries.push(placeholder_for(collection).to_string());
        }
        Ok(Self { collection, entries })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist a new record under a fresh time-based id and append it to the
    /// in-memory pool. Returns the generated id.
    pub fn add_image(&mut self, conn: &Connection, data_url: &str) -> Result<String> {
        let record = ImageRecord {
            id: next_record_id(),
            data_url: data_url.to_string(),
        };
        insert_image(conn, self.collection, &record)?;
        self.entries.push(record.data_url);
        Ok(record.id)
    }

    /// Remove an entry by its data URL value. A pool of size 1 is left
    /// unchanged with no storage call (floor invariant). The stored record is
    /// found by scanning the collection for a matching data URL; entries that
    /// were never persisted (the placeholder) remove in memory only. Returns
    /// whether the in-memory pool changed.
    pub fn remove_image(&mut self, conn: &Connection, data_url: &str) -> Result<bool> {
        if self.entries.len() <= 1 {
            return Ok(false);
        }

        let position = match self.entries.iter().position(|entry| entry == data_url) {
            Some(p) => p,
            None => return Ok(false),
        };
        self.entries.remove(position);

        // Value-based delete: the surface never held the storage id, so scan
        // the collection for the matching payload. No match means nothing to
        // delete — the in-memory removal stands.
        let records = list_images(conn, self.collection)?;
        if let Some(stored) = records.iter().find(|record| record.data_url == data_url) {
            delete_image(conn, self.collection, &stored.id)?;
        }

        Ok(true)
    }
}
