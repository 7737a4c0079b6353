//! Scenario filtering gates.
//!
//! A scenario qualifies for a run only when three independent gates pass:
//! its expectation resolves for the active profile key, its declared
//! version range supports the target version, and it matches the optional
//! single-query selector. A failed gate excludes the scenario with a
//! logged warning; it is never a fatal error.

use crate::catalog::{Expectation, Scenario, VersionRange};
use std::fmt;
use tracing::warn;

/// Why a scenario was excluded from the run. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No expectation is defined for the active profile key.
    NoExpectation,
    /// The target version falls outside the scenario's declared range.
    UnsupportedVersion,
    /// The operator pinned a single query and this is not it.
    NotSelected,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoExpectation => write!(f, "no expectation for the active profile"),
            SkipReason::UnsupportedVersion => write!(f, "target version not supported"),
            SkipReason::NotSelected => write!(f, "not the selected query"),
        }
    }
}

/// Does `target_version` satisfy the scenario's declared range?
///
/// Bounds are inclusive and each side is optional; no range at all means
/// the scenario always applies.
pub fn version_supported(target_version: f64, range: Option<&VersionRange>) -> bool {
    if let Some(range) = range {
        if let Some(min) = range.min {
            if target_version < min {
                return false;
            }
        }
        if let Some(max) = range.max {
            if target_version > max {
                return false;
            }
        }
    }
    true
}

/// Look up the expectation for `profile_key`, exactly as authored.
///
/// Resolution is an exact key match only. Falling back to a default
/// profile when the key is absent is a deliberate non-feature; a caller
/// wanting that behavior wraps this function rather than the engine
/// guessing.
pub fn resolve_expectation<'a>(scenario: &'a Scenario, profile_key: &str) -> Option<&'a Expectation> {
    scenario.expectations.get(profile_key)
}

/// Evaluate all three gates for one scenario, logging a warning naming the
/// query and the failing gate on exclusion.
pub fn evaluate<'a>(
    scenario: &'a Scenario,
    target_version: f64,
    profile_key: &str,
    selector: Option<&str>,
) -> Result<&'a Expectation, SkipReason> {
    let query = scenario.query.as_str();

    let Some(expectation) = resolve_expectation(scenario, profile_key) else {
        warn!("Skipping query: {query}. Expectation is missing, check the scenario definition.");
        return Err(SkipReason::NoExpectation);
    };

    if !version_supported(target_version, scenario.version.as_ref()) {
        warn!("Skipping query: {query}. Scenario version is not supported by this target.");
        return Err(SkipReason::UnsupportedVersion);
    }

    if let Some(selected) = selector {
        if selected != query {
            warn!("Skipping query: {query}. A specific query was set to run and it is not this one.");
            return Err(SkipReason::NotSelected);
        }
    }

    Ok(expectation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: Option<f64>, max: Option<f64>) -> VersionRange {
        VersionRange { min, max }
    }

    #[test]
    fn test_no_range_always_supported() {
        assert!(version_supported(0.0, None));
        assert!(version_supported(41.0, None));
    }

    #[test]
    fn test_min_bound_is_inclusive() {
        let r = range(Some(40.0), None);
        assert!(!version_supported(38.0, Some(&r)));
        assert!(version_supported(40.0, Some(&r)));
        assert!(version_supported(41.0, Some(&r)));
    }

    #[test]
    fn test_max_bound_is_inclusive() {
        let r = range(None, Some(41.0));
        assert!(version_supported(41.0, Some(&r)));
        assert!(!version_supported(41.1, Some(&r)));
    }

    #[test]
    fn test_combined_bounds_are_a_conjunction() {
        let r = range(Some(40.0), Some(42.0));
        assert!(!version_supported(39.9, Some(&r)));
        assert!(version_supported(40.0, Some(&r)));
        assert!(version_supported(42.0, Some(&r)));
        assert!(!version_supported(42.5, Some(&r)));
    }
}
