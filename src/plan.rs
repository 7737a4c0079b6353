//! Load-plan construction.
//!
//! A [`LoadUnit`] is one schedulable slice of injected traffic: a target
//! query bound to an injection profile. Which profile and its numbers are
//! orchestration-level configuration, not part of the scenario document;
//! the only scenario-specific input is the query path.
//!
//! The [`ProtocolProfile`] (base URL, credentials, headers, connection
//! limits) is built once per run and shared by reference across all units;
//! nothing mutates it after planning completes.

use std::time::Duration;
use url::Url;

/// Shared connection/auth/header configuration for a run.
#[derive(Debug, Clone)]
pub struct ProtocolProfile {
    pub base_url: Url,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub max_connections_per_host: usize,
    /// Path requested once, unmeasured, before load injection begins.
    pub warmup_path: Option<String>,
}

impl ProtocolProfile {
    pub fn new(
        instance: &str,
        username: &str,
        password: &str,
        warmup_path: Option<String>,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(instance)?;
        Ok(Self {
            base_url,
            username: username.to_string(),
            password: password.to_string(),
            user_agent: format!("Stampede/Performance Test: {instance}"),
            max_connections_per_host: 100,
            warmup_path,
        })
    }

    /// Absolute URL for a request path+query, concatenated onto the base.
    pub fn url_for(&self, query: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), query)
    }
}

/// Virtual-user concurrency strategy for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionProfile {
    /// N concurrent users sustained for a fixed duration.
    Constant { users: u32, duration: Duration },
    /// User count climbing from 0 to `users` over `ramp`, then holding
    /// steady for `hold`.
    Ramp { users: u32, ramp: Duration, hold: Duration },
}

impl InjectionProfile {
    /// Total wall-clock time the unit injects traffic for.
    pub fn total_duration(&self) -> Duration {
        match self {
            InjectionProfile::Constant { duration, .. } => *duration,
            InjectionProfile::Ramp { ramp, hold, .. } => *ramp + *hold,
        }
    }
}

/// One schedulable slice of injected traffic. Ephemeral: built fresh per
/// run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadUnit {
    /// Name used for logging and stats correlation; the query itself.
    pub name: String,
    /// Request path+query to exercise.
    pub query: String,
    pub injection: InjectionProfile,
    /// Inert units execute a single trivial request and carry no pass/fail
    /// meaning; they exist so the engine never runs with zero units.
    pub inert: bool,
}

/// Build the load unit for one qualifying scenario.
pub fn build_unit(query: &str, injection: InjectionProfile) -> LoadUnit {
    LoadUnit {
        name: query.to_string(),
        query: query.to_string(),
        injection,
        inert: false,
    }
}

/// The fallback unit substituted when no scenario qualifies: one trivial
/// request against the protocol base URL, no assertions attached.
pub fn inert_unit() -> LoadUnit {
    LoadUnit {
        name: "inert (no qualifying scenario)".to_string(),
        query: String::new(),
        injection: InjectionProfile::Constant {
            users: 1,
            duration: Duration::from_secs(1),
        },
        inert: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_concatenates_path_and_query() {
        let protocol = ProtocolProfile::new("http://localhost:8080", "admin", "x", None).unwrap();
        assert_eq!(
            protocol.url_for("/api/me?fields=id"),
            "http://localhost:8080/api/me?fields=id"
        );
    }

    #[test]
    fn test_inert_unit_is_a_single_user_with_no_query() {
        let unit = inert_unit();
        assert!(unit.inert);
        assert_eq!(
            unit.injection,
            InjectionProfile::Constant { users: 1, duration: Duration::from_secs(1) }
        );
        assert!(unit.query.is_empty());
    }

    #[test]
    fn test_ramp_total_duration_includes_hold() {
        let profile = InjectionProfile::Ramp {
            users: 15,
            ramp: Duration::from_secs(3),
            hold: Duration::from_secs(20),
        };
        assert_eq!(profile.total_duration(), Duration::from_secs(23));
    }
}
