//! # Backport Mappings System
//!
//! This crate builds and serves the versioned identifier tables a
//! translation module needs: which sound, block, item or entity id on one
//! protocol version corresponds to which id on the other.
//!
//! ## Features
//! - Table join of old and new identifier documents (arrays or id-keyed objects)
//! - Hand-maintained diff overlays with per-id overrides and removals
//! - Inverse views over forward tables, no duplicated storage
//! - Foreign-table adoption from sibling modules
//! - Extra lookup tables: item replacement records, sound key renames, entity names
//! - Per-table miss diagnostics with an allow-list of historically quiet tables
//!
//! ## Data Layout
//!
//! Each protocol version ships one JSON document of identifier tables; a
//! version pair may add a diff document named `mapping-<new>to<old>.json`.
//! Everything is parsed once at module activation and immutable afterwards.

pub mod error;
pub mod loader;
pub mod store;
pub mod table;

pub use error::{MappingError, Result};
pub use loader::{diff_file_name, load_diff_document, load_document, MappingDocument};
pub use store::{MappedItem, MappingStore, TableLayout, TableSource, TableSpec};
pub use table::{IdMappings, InverseView};
