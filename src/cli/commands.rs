use crate::config::RunConfig;
use crate::engine::BlockingLoadEngine;
use crate::fixtures::ReqwestFixtureClient;
use crate::orchestrator::Orchestrator;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Command-line interface for stampede
#[derive(Parser)]
#[command(name = "stampede")]
#[command(about = "Scenario-driven HTTP load-test orchestrator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Execute the load-test run described by a scenario catalog
    Run {
        #[command(flatten)]
        config: RunConfig,
    },
    /// Load and validate a scenario catalog without touching the target
    Check {
        /// Catalog locator: bundled resource name or file path
        #[arg(long, env = "STAMPEDE_SCENARIO")]
        scenario: String,

        /// Directory of bundled scenario documents
        #[arg(long, env = "STAMPEDE_RESOURCES", default_value = "scenarios")]
        resources: PathBuf,
    },
}

/// Run the parsed CLI command. Returns whether the run passed; fatal
/// errors (catalog, fixtures, engine) propagate as `Err`.
pub fn run_cli(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Run { config } => {
            let orchestrator = Orchestrator::new(&config)?;
            let fixture_client = ReqwestFixtureClient::new(orchestrator.protocol())?;
            let engine = BlockingLoadEngine::new();
            let outcome = orchestrator.run(&engine, &fixture_client)?;
            info!(
                "planned {} scenario(s), skipped {}",
                outcome.planned,
                outcome.skipped.len()
            );
            Ok(outcome.verdict.pass)
        }
        Commands::Check { scenario, resources } => {
            let scenarios = crate::catalog::load_catalog(&scenario, &resources)?;
            for s in &scenarios {
                info!(
                    "{} (expectation profiles: {}, fixtures: {})",
                    s.query,
                    s.expectations.len(),
                    s.fixtures.len()
                );
            }
            info!("catalog '{}' is valid: {} scenario(s)", scenario, scenarios.len());
            Ok(true)
        }
    }
}
