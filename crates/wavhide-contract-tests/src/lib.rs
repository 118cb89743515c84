//! Locations of the frozen wire contracts shared by the contract tests.

use std::path::PathBuf;

/// Root of the `contracts/` directory.
pub const CONTRACTS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../contracts");

/// Path of a schema file, e.g. `schema_path("encode-response")`.
pub fn schema_path(name: &str) -> PathBuf {
    PathBuf::from(CONTRACTS_DIR).join(format!("{name}.schema.json"))
}

/// Path of the valid fixture for a schema.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(CONTRACTS_DIR)
        .join("fixtures")
        .join(format!("{name}.valid.json"))
}
