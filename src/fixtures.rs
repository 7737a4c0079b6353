//! Idempotent fixture provisioning.
//!
//! Each fixture is applied with create-then-update-on-conflict semantics:
//! POST the resource to its `onCreatePath`, and when the target reports an
//! HTTP 409 conflict (typically a prior run already created it), PUT the
//! same resource to its `onConflictPath` instead. Any other failure, or a
//! failure of the conflict-recovery update itself, aborts the whole run:
//! traffic is never injected against a target whose fixtures are in an
//! unknown state.
//!
//! Fixtures within a scenario are applied strictly in declared order, one
//! at a time, since later fixtures may depend on earlier ones existing.
//! Nothing is ever deleted or rolled back here; cleanup is out of scope.

use crate::catalog::{Fixture, Scenario};
use crate::plan::ProtocolProfile;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// Structured HTTP failure surfaced by a fixture client.
#[derive(Debug)]
pub enum HttpError {
    /// The target answered with a non-success status.
    Status { status: u16, body: String },
    /// The request never produced a status (connect/timeout/etc.).
    Transport { message: String },
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Transport { .. } => None,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpError::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            HttpError::Transport { message } => write!(f, "transport error: {message}"),
        }
    }
}

impl std::error::Error for HttpError {}

/// Narrow client capability the provisioner needs: create or update one
/// JSON resource at a path relative to the target instance.
pub trait HttpFixtureClient {
    fn create(&self, path: &str, resource: &Value) -> Result<(), HttpError>;
    fn update(&self, path: &str, resource: &Value) -> Result<(), HttpError>;
}

/// How a fixture ended up applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    /// The create reported 409 and the follow-up update succeeded.
    UpdatedAfterConflict,
}

/// Fatal provisioning failure: carries the path that failed and, when the
/// target answered at all, the HTTP status it gave.
#[derive(Debug)]
pub struct FixtureError {
    pub path: String,
    pub status: Option<u16>,
    pub message: String,
}

impl FixtureError {
    fn new(path: &str, source: HttpError) -> Self {
        Self {
            path: path.to_string(),
            status: source.status(),
            message: source.to_string(),
        }
    }
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixture provisioning failed at '{}': {}", self.path, self.message)
    }
}

impl std::error::Error for FixtureError {}

/// Apply one fixture with create-then-update-on-409 semantics.
pub fn provision(
    fixture: &Fixture,
    client: &dyn HttpFixtureClient,
) -> Result<ProvisionOutcome, FixtureError> {
    match client.create(&fixture.on_create_path, &fixture.resource) {
        Ok(()) => Ok(ProvisionOutcome::Created),
        Err(err) if err.status() == Some(409) => {
            debug!(
                "fixture '{}' already exists, updating '{}'",
                fixture.on_create_path, fixture.on_conflict_path
            );
            client
                .update(&fixture.on_conflict_path, &fixture.resource)
                .map(|()| ProvisionOutcome::UpdatedAfterConflict)
                .map_err(|err| FixtureError::new(&fixture.on_conflict_path, err))
        }
        Err(err) => Err(FixtureError::new(&fixture.on_create_path, err)),
    }
}

/// Apply every fixture of a scenario in declared order.
pub fn provision_scenario(
    scenario: &Scenario,
    client: &dyn HttpFixtureClient,
) -> Result<(), FixtureError> {
    for fixture in &scenario.fixtures {
        let outcome = provision(fixture, client)?;
        info!(
            "fixture '{}' for query '{}': {:?}",
            fixture.on_create_path, scenario.query, outcome
        );
    }
    Ok(())
}

/// Blocking reqwest-backed fixture client for a shared protocol profile.
pub struct ReqwestFixtureClient {
    client: reqwest::blocking::Client,
    protocol: ProtocolProfile,
}

impl ReqwestFixtureClient {
    pub fn new(protocol: &ProtocolProfile) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(protocol.user_agent.clone())
            .pool_max_idle_per_host(protocol.max_connections_per_host)
            .build()?;
        Ok(Self { client, protocol: protocol.clone() })
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<(), HttpError> {
        let response = request
            .basic_auth(&self.protocol.username, Some(&self.protocol.password))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| HttpError::Transport { message: e.to_string() })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(HttpError::Status {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        })
    }
}

impl HttpFixtureClient for ReqwestFixtureClient {
    fn create(&self, path: &str, resource: &Value) -> Result<(), HttpError> {
        self.send(self.client.post(self.protocol.url_for(path)).json(resource))
    }

    fn update(&self, path: &str, resource: &Value) -> Result<(), HttpError> {
        self.send(self.client.put(self.protocol.url_for(path)).json(resource))
    }
}
