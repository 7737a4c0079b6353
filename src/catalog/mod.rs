//! # Scenario Catalog Module
//!
//! Loading and modeling of scenario catalog documents.
//!
//! A catalog is an ordered list of [`Scenario`] records describing which
//! queries to exercise, which target-system versions each applies to, the
//! performance expectations to assert, and the fixtures to provision first.
//! Documents are JSON or YAML, chosen by file extension, and locators
//! resolve first against a bundled resources directory and then as plain
//! filesystem paths.
//!
//! Declaration order is preserved: it drives load-plan ordering and log
//! readability, not correctness.

mod load;
mod types;

pub use load::{load_catalog, CatalogError};
pub use types::{Catalog, Expectation, Fixture, Scenario, VersionRange};
