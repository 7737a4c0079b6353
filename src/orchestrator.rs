//! Run orchestration.
//!
//! The orchestrator composes the whole pipeline in strictly sequential,
//! single-threaded phases:
//!
//! `Loading → Filtering → Provisioning → Planning → Ready → Done`
//!
//! Catalog and fixture failures are fatal and absorb the run before any
//! load injection; filtering exclusions are logged warnings only. When no
//! scenario qualifies, a single inert unit is substituted so the engine
//! always has something to execute and the run never crashes on "zero
//! scenarios" (the run then passes by definition).
//!
//! Nothing is mutated after Planning completes; the engine receives the
//! finished plan and blocks until it reports a verdict.

use crate::assertions::{build_assertions, AssertionSpec};
use crate::catalog::{load_catalog, CatalogError, Scenario};
use crate::config::RunConfig;
use crate::engine::{LoadEngine, RunVerdict};
use crate::filter::{self, SkipReason};
use crate::fixtures::{provision_scenario, FixtureError, HttpFixtureClient};
use crate::plan::{build_unit, inert_unit, LoadUnit, ProtocolProfile};
use std::fmt;
use tracing::{info, warn};

/// Fatal run failure. Reaching this terminates the run with a non-zero
/// exit before (Catalog/Fixture) or during (Engine) load injection.
#[derive(Debug)]
pub enum RunError {
    Catalog(CatalogError),
    Fixture(FixtureError),
    Engine(anyhow::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Catalog(e) => write!(f, "{e}"),
            RunError::Fixture(e) => write!(f, "{e}"),
            RunError::Engine(e) => write!(f, "load engine failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Catalog(e) => Some(e),
            RunError::Fixture(e) => Some(e),
            RunError::Engine(e) => {
                let source: &(dyn std::error::Error + 'static) = e.as_ref();
                Some(source)
            }
        }
    }
}

impl From<CatalogError> for RunError {
    fn from(e: CatalogError) -> Self {
        RunError::Catalog(e)
    }
}

impl From<FixtureError> for RunError {
    fn from(e: FixtureError) -> Self {
        RunError::Fixture(e)
    }
}

/// What a completed run produced, fatal errors aside.
#[derive(Debug)]
pub struct RunOutcome {
    pub verdict: RunVerdict,
    /// Scenarios that made it into the plan.
    pub planned: usize,
    /// Excluded scenarios with their gate, in catalog order.
    pub skipped: Vec<(String, SkipReason)>,
}

/// Drives one load-test run end to end.
pub struct Orchestrator<'a> {
    config: &'a RunConfig,
    protocol: ProtocolProfile,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a RunConfig) -> anyhow::Result<Self> {
        let protocol = config.protocol_profile()?;
        Ok(Self { config, protocol })
    }

    pub fn protocol(&self) -> &ProtocolProfile {
        &self.protocol
    }

    /// Execute the full pipeline against the given collaborators.
    pub fn run(
        &self,
        engine: &dyn LoadEngine,
        fixture_client: &dyn HttpFixtureClient,
    ) -> Result<RunOutcome, RunError> {
        // Loading
        info!("pointing to instance: {}", self.config.instance);
        let scenarios = load_catalog(&self.config.scenario, &self.config.resources)?;
        info!("loaded {} scenario(s) from '{}'", scenarios.len(), self.config.scenario);

        // Filtering
        let mut selected: Vec<(&Scenario, AssertionSpec)> = Vec::new();
        let mut skipped: Vec<(String, SkipReason)> = Vec::new();
        for scenario in &scenarios {
            match filter::evaluate(
                scenario,
                self.config.version,
                &self.config.profile,
                self.config.query.as_deref(),
            ) {
                Ok(expectation) => {
                    selected.push((scenario, build_assertions(&scenario.query, expectation)));
                }
                Err(reason) => skipped.push((scenario.query.clone(), reason)),
            }
        }

        // Provisioning: all-or-abort, scenario order, declared fixture order.
        for (scenario, _) in &selected {
            if !scenario.fixtures.is_empty() {
                provision_scenario(scenario, fixture_client)?;
            }
        }

        // Planning
        let injection = self.config.injection_profile();
        let mut units: Vec<LoadUnit> = Vec::new();
        let mut assertions: Vec<AssertionSpec> = Vec::new();
        for (scenario, spec) in selected {
            units.push(build_unit(&scenario.query, injection));
            assertions.push(spec);
        }
        let planned = units.len();

        // Ready → Done
        if units.is_empty() {
            warn!("no scenario qualified for this run, substituting an inert unit");
            units.push(inert_unit());
        }
        let verdict = engine
            .run(&units, &assertions, &self.protocol)
            .map_err(RunError::Engine)?;

        log_summary(&verdict);
        Ok(RunOutcome { verdict, planned, skipped })
    }
}

fn log_summary(verdict: &RunVerdict) {
    for result in &verdict.per_assertion {
        if result.passed {
            info!(
                "PASS {} {} {} (observed {:.1})",
                result.query, result.metric, result.bound, result.observed
            );
        } else {
            warn!(
                "FAIL {} {} {} (observed {:.1})",
                result.query, result.metric, result.bound, result.observed
            );
        }
    }
    if verdict.pass {
        info!("run verdict: PASS");
    } else {
        warn!("run verdict: FAIL");
    }
}
