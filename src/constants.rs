// Tabnook constants
// Values that are part of the persisted-data contract. Changing the seeds or
// the welcome string changes what existing stores display.

// Paths
pub const TABNOOK_FOLDER: &str = ".tabnook";
pub const DB_FILENAME: &str = "tabnook.db";

// Singleton document key (quotes and settings collections)
pub const SINGLETON_ID: &str = "main";

// Fallbacks shown when a pool is empty
pub const WELCOME_QUOTE: &str = "Welcome to tabnook!";
pub const PLACEHOLDER_BACKGROUND: &str = "https://placehold.co/600x400.png";
pub const PLACEHOLDER_DISPLAYED: &str = "https://placehold.co/800x400.png";

// Per-category seeds for daily selection. Distinct so the three categories
// decorrelate even though they share the same calendar day.
pub const SEED_QUOTE: &str = "quote";
pub const SEED_BACKGROUND: &str = "background";
pub const SEED_DISPLAYED: &str = "displayed";

// Write coalescing
pub const DEBOUNCE_WINDOW_MS: u64 = 300;
