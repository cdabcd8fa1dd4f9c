//! Where Unicode data files come from
//!
//! Class tables are built from Unicode Character Database files. A copy of
//! the UCD 14.0.0 files is compiled into the crate and used by default.
//! To build the tables from other files, point the crate at a directory
//! holding `LineBreak.txt`, `GraphemeBreakProperty.txt`,
//! `WordBreakProperty.txt` and `emoji-data.txt`.
//!
//! # Example
//!
//! ```
//! use typeseg_unicode::ucd_config;
//!
//! // Must happen before the first table setup; tables are built once
//! ucd_config::set_ucd_dir(Some("/usr/share/unicode".into()));
//! assert!(ucd_config::ucd_dir().is_some());
//!
//! // Back to the bundled files
//! ucd_config::set_ucd_dir(None);
//! ```
//!
//! # Environment Variables
//!
//! `TYPESEG_UCD_DIR` selects the data directory at startup:
//!
//! ```bash
//! TYPESEG_UCD_DIR=/usr/share/unicode ./my_app
//! ```
//!
//! `TYPESEG_UCD_TEST_DIR` names a directory with the official conformance
//! files (`GraphemeBreakTest.txt`, `WordBreakTest.txt`,
//! `LineBreakTest.txt`); the test suite runs them when it is set.

use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Version of the bundled data files
pub const BUNDLED_UNICODE_VERSION: &str = "14.0.0";

/// Directory override; `None` means bundled data
static UCD_DIR: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Whether the env var has been checked
static ENV_CHECKED: OnceLock<()> = OnceLock::new();

fn check_env() {
    ENV_CHECKED.get_or_init(|| {
        if let Some(dir) = std::env::var_os("TYPESEG_UCD_DIR").filter(|v| !v.is_empty()) {
            let dir = PathBuf::from(dir);
            log::info!("Typeseg reads UCD files from {} via TYPESEG_UCD_DIR", dir.display());
            *UCD_DIR.write() = Some(dir);
        }
    });
}

/// Directory the class tables are read from, if not the bundled data
pub fn ucd_dir() -> Option<PathBuf> {
    check_env();
    UCD_DIR.read().clone()
}

/// Read tables from `dir` instead of the bundled data, or go back with `None`
///
/// This overrides the environment variable. Tables that were already set
/// up keep the data they were built from.
pub fn set_ucd_dir(dir: Option<PathBuf>) {
    check_env();
    log::debug!(
        "Typeseg UCD source set to {}",
        dir.as_ref()
            .map_or_else(|| "bundled data".to_string(), |d| d.display().to_string())
    );
    *UCD_DIR.write() = dir;
}

/// Directory holding the official break test files, from `TYPESEG_UCD_TEST_DIR`
pub fn conformance_dir() -> Option<PathBuf> {
    std::env::var_os("TYPESEG_UCD_TEST_DIR")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
