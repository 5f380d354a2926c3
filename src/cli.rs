// Tabnook CLI binary

use std::path::PathBuf;

use anyhow::Result;
use base64::Engine as _;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use tabnook::pool::{ImagePool, QuoteDraft};
use tabnook::settings::{load_settings, save_settings, Mode};
use tabnook::store::records::{
    get_quote_document, list_images, put_quote_document, ImageCollection, QuoteDocument,
};
use tabnook::store::{default_store_path, open_store};
use tabnook::tab::load_tab_content;

#[derive(Parser)]
#[command(name = "tabnook")]
#[command(about = "Tabnook - a content store and selector for your new-tab page", long_about = None)]
#[command(version)]
struct Cli {
    /// Store path (defaults to ~/.tabnook/tabnook.db)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new store
    Init,

    /// Pick and print today's quote/background/displayed combination
    Show,

    /// Manage the quote pool
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Manage the background image pool
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// Manage the displayed (featured) image pool
    Displayed {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// Show or change per-category selection modes
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Append a quote
    Add {
        /// Quote text
        text: String,
    },
    /// Remove a quote by its list position
    Remove {
        /// Zero-based index (see 'quote list')
        index: usize,
    },
    /// List quotes
    List,
}

#[derive(Subcommand)]
enum ImageCommands {
    /// Add an image by data URL or file
    Add {
        /// A data: URL
        data_url: Option<String>,
        /// Read an image file and encode it as a data URL
        #[arg(short, long, conflicts_with = "data_url")]
        file: Option<PathBuf>,
    },
    /// Remove the image matching a data URL
    Remove {
        /// The data URL to remove (see 'list')
        data_url: String,
    },
    /// List images
    List,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the current modes
    Get,
    /// Set the mode for one category
    Set {
        /// Category: background, displayed, or quotes
        category: String,
        /// Mode: random or daily
        mode: Mode,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cmd_init(cli.store),
        Commands::Show => cmd_show(cli.store),
        Commands::Quote { command } => {
            let conn = open_existing_store(cli.store)?;
            match command {
                QuoteCommands::Add { text } => cmd_quote_add(&conn, &text),
                QuoteCommands::Remove { index } => cmd_quote_remove(&conn, index),
                QuoteCommands::List => cmd_quote_list(&conn),
            }
        }
        Commands::Image { command } => {
            let conn = open_existing_store(cli.store)?;
            run_image_command(&conn, ImageCollection::Background, command)
        }
        Commands::Displayed { command } => {
            let conn = open_existing_store(cli.store)?;
            run_image_command(&conn, ImageCollection::Displayed, command)
        }
        Commands::Settings { command } => {
            let conn = open_existing_store(cli.store)?;
            match command {
                SettingsCommands::Get => cmd_settings_get(&conn),
                SettingsCommands::Set { category, mode } => cmd_settings_set(&conn, &category, mode),
            }
        }
    }
}

fn cmd_init(store: Option<PathBuf>) -> Result<()> {
    let db_path = resolve_store_path(store)?;
    if db_path.exists() {
        anyhow::bail!("Store already exists at {}", db_path.display());
    }

    open_store(&db_path)?;

    println!("Initialized store at {}", db_path.display());
    println!("Add content with:");
    println!("  tabnook quote add \"...\"");
    println!("  tabnook image add --file photo.png");
    println!("  tabnook displayed add --file photo.png");

    Ok(())
}

fn cmd_show(store: Option<PathBuf>) -> Result<()> {
    let conn = open_existing_store(store)?;
    let content = load_tab_content(&conn)?;

    println!("Quote:      \"{}\"", content.quote);
    println!("Background: {}", truncate(&content.background, 60));
    println!("Displayed:  {}", truncate(&content.displayed, 60));

    Ok(())
}

fn cmd_quote_add(conn: &Connection, text: &str) -> Result<()> {
    let current = get_quote_document(conn)?
        .map(|doc| doc.text)
        .unwrap_or_default();

    let mut draft = QuoteDraft::from_text(&current);
    if !draft.add(text) {
        println!("Nothing to add (quote is empty).");
        return Ok(());
    }

    put_quote_document(conn, &QuoteDocument::new(draft.text()))?;
    println!("Added quote ({} total).", draft.len());
    Ok(())
}

fn cmd_quote_remove(conn: &Connection, index: usize) -> Result<()> {
    let current = get_quote_document(conn)?
        .map(|doc| doc.text)
        .unwrap_or_default();

    let mut draft = QuoteDraft::from_text(&current);
    let removed = draft.remove(index)?;

    put_quote_document(conn, &QuoteDocument::new(draft.text()))?;
    println!("Removed \"{}\" ({} remaining).", removed, draft.len());
    Ok(())
}

fn cmd_quote_list(conn: &Connection) -> Result<()> {
    let current = get_quote_document(conn)?
        .map(|doc| doc.text)
        .unwrap_or_default();
    let draft = QuoteDraft::from_text(&current);

    if draft.is_empty() {
        println!("No quotes yet. Use 'tabnook quote add \"...\"'.");
        return Ok(());
    }

    for (index, quote) in draft.quotes().iter().enumerate() {
        println!("{:>4}  {}", index, quote);
    }
    Ok(())
}

fn run_image_command(
    conn: &Connection,
    collection: ImageCollection,
    command: ImageCommands,
) -> Result<()> {
    match command {
        ImageCommands::Add { data_url, file } => {
            let data_url = match (data_url, file) {
                (Some(url), _) => url,
                (None, Some(path)) => encode_file_as_data_url(&path)?,
                (None, None) => anyhow::bail!("Provide a data URL or --file <path>"),
            };

            let mut pool = ImagePool::load(conn, collection)?;
            let id = pool.add_image(conn, &data_url)?;
            println!("Added image {} ({} in pool).", id, pool.len());
        }
        ImageCommands::Remove { data_url } => {
            let mut pool = ImagePool::load(conn, collection)?;
            if pool.remove_image(conn, &data_url)? {
                println!("Removed image ({} remaining).", pool.len());
            } else if pool.len() <= 1 {
                println!("At least one image must remain; nothing removed.");
            } else {
                println!("No matching image found; nothing removed.");
            }
        }
        ImageCommands::List => {
            let records = list_images(conn, collection)?;
            if records.is_empty() {
                println!("No images stored (a placeholder is shown instead).");
                return Ok(());
            }
            println!("{:>16}  {}", "ID", "Data URL");
            println!("{}", "-".repeat(70));
            for record in records {
                println!("{:>16}  {}", record.id, truncate(&record.data_url, 50));
            }
        }
    }
    Ok(())
}

fn cmd_settings_get(conn: &Connection) -> Result<()> {
    let settings = load_settings(conn)?;
    println!("background: {}", settings.background_mode.as_str());
    println!("displayed:  {}", settings.displayed_mode.as_str());
    println!("quotes:     {}", settings.quotes_mode.as_str());
    Ok(())
}

fn cmd_settings_set(conn: &Connection, category: &str, mode: Mode) -> Result<()> {
    let mut settings = load_settings(conn)?;
    match category {
        "background" => settings.background_mode = mode,
        "displayed" => settings.displayed_mode = mode,
        "quotes" => settings.quotes_mode = mode,
        other => anyhow::bail!(
            "Unknown category '{}' (expected background, displayed, or quotes)",
            other
        ),
    }
    save_settings(conn, &settings)?;
    println!("Set {} mode to {}.", category, mode.as_str());
    Ok(())
}

// --- Helper Functions ---

fn resolve_store_path(store: Option<PathBuf>) -> Result<PathBuf> {
    match store {
        Some(path) => Ok(path),
        None => default_store_path(),
    }
}

fn open_existing_store(store: Option<PathBuf>) -> Result<Connection> {
    let db_path = resolve_store_path(store)?;
    if !db_path.exists() {
        anyhow::bail!(
            "No store found at {}. Use 'tabnook init' to create one.",
            db_path.display()
        );
    }
    open_store(&db_path)
}

/// Read an image file and wrap it as a self-contained base64 data URL, the
/// payload shape image records store.
fn encode_file_as_data_url(path: &PathBuf) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;

    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => anyhow::bail!(
            "Unsupported image type: {} (expected png, jpg, gif, webp, or svg)",
            path.display()
        ),
    };

    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{};base64,{}", mime, encoded))
}

/// Shorten a display string to at most `max` characters. Data URLs are
/// arbitrary user input and may contain multi-byte characters, so cut on a
/// char boundary, never a byte index.
fn truncate(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_value_unchanged() {
        assert_eq!(truncate("data:image/png;base64,AAAA", 60), "data:image/png;base64,AAAA");
        assert_eq!(truncate("", 10), "");
    }

    #[test]
    fn test_truncate_long_value_cut_with_ellipsis() {
        assert_eq!(truncate("abcdefgh", 5), "abcde...");
        assert_eq!(truncate("abcde", 5), "abcde");
    }

    #[test]
    fn test_truncate_multibyte_payload_does_not_panic() {
        // utf8 data URL whose cut point lands inside a 3-byte character
        let url = format!("data:image/svg+xml;utf8,{}", "€".repeat(40));
        let shortened = truncate(&url, 30);
        assert!(shortened.ends_with("..."));
        assert_eq!(shortened.chars().count(), 33);

        // Every cut position must be safe
        for max in 0..url.chars().count() + 2 {
            let _ = truncate(&url, max);
        }
    }
}
