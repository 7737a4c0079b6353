//! # CLI Module
//!
//! Command-line interface for the stampede orchestrator.
//!
//! ## Commands
//!
//! ### `run`
//!
//! Execute a full load-test run against a target instance:
//!
//! ```bash
//! stampede run \
//!     --instance https://play.example.org \
//!     --username admin --password ****** \
//!     --version 41 \
//!     --scenario raw_speed.json
//! ```
//!
//! Every flag has a `STAMPEDE_*` environment-variable fallback; see
//! `stampede run --help`.
//!
//! Exit status is zero iff the engine verdict passes (including the
//! nothing-qualified inert fallback) and non-zero on any fatal error or
//! failed assertion.
//!
//! ### `check`
//!
//! Load and validate a scenario catalog without touching the target:
//!
//! ```bash
//! stampede check --scenario raw_speed.json
//! ```

mod commands;

pub use commands::{run_cli, Cli, Commands};
