// Tab composition — the load-time read path.
//
// Reads settings and the three pools once per tab load and materializes the
// one quote/background/displayed combination to render. Empty pools yield the
// built-in fallbacks; the selection engine is never called with an empty pool.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::constants::{
    PLACEHOLDER_BACKGROUND, PLACEHOLDER_DISPLAYED, SEED_BACKGROUND, SEED_DISPLAYED, SEED_QUOTE,
    WELCOME_QUOTE,
};
use crate::error::Result;
use crate::pool::parse_quotes;
use crate::select::select_index;
use crate::settings::{load_settings, Mode};
use crate::store::records::{get_quote_document, list_images, ImageCollection};

/// One rendered combination: what the new-tab surface shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabContent {
    pub quote: String,
    pub background: String,
    pub displayed: String,
}

/// Load settings and pools, then pick one element per category. Settings are
/// read first since every pick depends on its category's mode; the three pool
/// reads have no ordering dependency between them.
pub fn load_tab_content(conn: &Connection) -> Result<TabContent> {
    let settings = load_settings(conn)?;

    let quote = match get_quote_document(conn)? {
        Some(doc) => {
            let pool = parse_quotes(&doc.text);
            if pool.is_empty() {
                WELCOME_QUOTE.to_string()
            } else {
                let index = select_index(pool.len(), settings.quotes_mode, SEED_QUOTE);
                pool[index].clone()
            }
        }
        None => WELCOME_QUOTE.to_string(),
    };

    let background = pick_image(
        conn,
        ImageCollection::Background,
        settings.background_mode,
        SEED_BACKGROUND,
        PLACEHOLDER_BACKGROUND,
    )?;
    let displayed = pick_image(
        conn,
        ImageCollection::Displayed,
        settings.displayed_mode,
        SEED_DISPLAYED,
        PLACEHOLDER_DISPLAYED,
    )?;

    Ok(TabContent {
        quote,
        background,
        displayed,
    })
}

fn pick_image(
    conn: &Connection,
    collection: ImageCollection,
    mode: Mode,
    seed: &str,
    placeholder: &str,
) -> Result<String> {
    let urls: Vec<String> = list_images(conn, collection)?
        .into_iter()
        .map(|record| record.data_url)
        .filter(|url| !url.is_empty())
        .collect();

    if urls.is_empty() {
        return Ok(placeholder.to_string());
    }

    let index = select_index(urls.len(), mode, seed);
    Ok(urls[index].clone())
}
