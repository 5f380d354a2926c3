// Tabnook — local content store and selector for a personal new-tab page.
//
// The core is the persistence-and-selection subsystem: a SQLite record store
// with four collections, a per-category settings model, a deterministic or
// random selection engine, a debounced write coalescer, and the pool editing
// operations. Rendering and file intake live at the edges (the CLI binary).

pub mod coalesce;
pub mod constants;
pub mod error;
pub mod pool;
pub mod select;
pub mod settings;
pub mod store;
pub mod tab;
