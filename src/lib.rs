//! # Stampede
//!
//! **Stampede** is a scenario-driven HTTP load-test orchestrator: instead of
//! hard-coding test logic, it loads a declarative catalog of scenarios,
//! decides which ones apply to the target system's version, provisions the
//! data fixtures they need, translates their expectations into measurable
//! pass/fail assertions, and hands the assembled load plan to a load
//! engine for execution.
//!
//! ## Architecture
//!
//! Data flows one way through the modules; no component calls back into an
//! earlier one:
//!
//! - **[`catalog`]** - scenario document model and catalog loading
//! - **[`filter`]** - version/expectation/selector gates deciding which
//!   scenarios qualify
//! - **[`fixtures`]** - idempotent create-then-update-on-conflict data
//!   provisioning
//! - **[`assertions`]** - expectation defaulting and threshold assertions
//! - **[`plan`]** - protocol profile, injection profiles and load units
//! - **[`engine`]** - the `LoadEngine` seam plus the bundled blocking
//!   executor
//! - **[`orchestrator`]** - the sequential Loading → Filtering →
//!   Provisioning → Planning → Done pipeline
//! - **[`config`]** / **[`cli`]** - operator-facing configuration and the
//!   `stampede` binary surface
//!
//! ## Example
//!
//! ```no_run
//! use stampede::catalog::load_catalog;
//! use std::path::Path;
//!
//! let scenarios = load_catalog("raw_speed.json", Path::new("scenarios"))?;
//! for scenario in &scenarios {
//!     println!("{}", scenario.query);
//! }
//! # Ok::<(), stampede::catalog::CatalogError>(())
//! ```
//!
//! ## Run semantics
//!
//! A run is all-or-abort up to the point of injection: a missing or corrupt
//! catalog, or any fixture failure, terminates the process with a non-zero
//! exit before traffic is generated. Scenarios excluded by a filtering gate
//! are logged warnings, never errors. If nothing qualifies, a single inert
//! unit is executed so the engine never sees an empty plan, and the run
//! passes.

pub mod assertions;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod filter;
pub mod fixtures;
pub mod orchestrator;
pub mod plan;

pub use catalog::{load_catalog, CatalogError, Expectation, Fixture, Scenario, VersionRange};
pub use engine::{BlockingLoadEngine, LoadEngine, RunVerdict};
pub use orchestrator::{Orchestrator, RunError, RunOutcome};
