//! Manifest loading
//!
//! `keel.toml` parsing and conversion into a `Graph`, plus the side effects
//! derived from it.

mod info_plist;
mod loader;
mod schema;

pub use info_plist::{derived_info_plist, DERIVED_INFO_PLISTS};
pub use loader::{TomlGraphLoader, MANIFEST_FILE};
