//! Threshold assertions derived from scenario expectations.
//!
//! [`build_assertions`] is pure data transformation: it turns an authored
//! [`Expectation`] into one threshold check per field, applying the
//! defaulting policy for absent fields. Measurement happens elsewhere; the
//! load engine evaluates the produced [`AssertionSpec`] against the
//! [`QueryStats`] it collected.
//!
//! Defaulting policy: an absent `min` becomes a floor of 0 ms (vacuously
//! true), while absent `max`/`mean`/`ninetyPercentile` become *unbounded*
//! caps. The success-rate floor is always 100% and is not configurable per
//! scenario: any failed request fails the run.

use crate::catalog::Expectation;
use std::fmt;

/// A measured quantity an assertion constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    ResponseTimeMin,
    ResponseTimeMax,
    ResponseTimeMean,
    ResponseTimeP90,
    SuccessRate,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::ResponseTimeMin => write!(f, "response time min"),
            Metric::ResponseTimeMax => write!(f, "response time max"),
            Metric::ResponseTimeMean => write!(f, "response time mean"),
            Metric::ResponseTimeP90 => write!(f, "response time 90th percentile"),
            Metric::SuccessRate => write!(f, "success rate"),
        }
    }
}

/// Threshold direction and value. Unbounded caps are `AtMost(f64::INFINITY)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtLeast(f64),
    AtMost(f64),
}

impl Bound {
    fn holds(&self, observed: f64) -> bool {
        match self {
            Bound::AtLeast(floor) => observed >= *floor,
            Bound::AtMost(cap) => observed <= *cap,
        }
    }

    /// An `AtMost(∞)` cap can never fail.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::AtMost(cap) if cap.is_infinite())
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::AtLeast(floor) => write!(f, ">= {floor}"),
            Bound::AtMost(cap) if cap.is_infinite() => write!(f, "unbounded"),
            Bound::AtMost(cap) => write!(f, "<= {cap}"),
        }
    }
}

/// One threshold check against one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assertion {
    pub metric: Metric,
    pub bound: Bound,
}

/// All threshold checks for one named query. Ephemeral: built fresh per
/// run, same lifetime as the load plan.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionSpec {
    pub query: String,
    pub assertions: Vec<Assertion>,
}

/// Measured results for one query, produced by the load engine.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStats {
    pub query: String,
    pub requests: u64,
    pub failures: u64,
    /// Response-time statistics in milliseconds, over all requests.
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub p90_ms: f64,
}

impl QueryStats {
    /// Percentage of requests that succeeded, 0–100.
    pub fn success_rate(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        (self.requests - self.failures) as f64 / self.requests as f64 * 100.0
    }
}

/// Outcome of evaluating one assertion against measured stats.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionResult {
    pub query: String,
    pub metric: Metric,
    pub bound: Bound,
    pub observed: f64,
    pub passed: bool,
}

/// Build the assertion set for one scenario/expectation pair.
///
/// Always produces five assertions: the four response-time thresholds
/// (defaulted per the policy above) plus the fixed 100% success-rate floor.
pub fn build_assertions(query: &str, expectation: &Expectation) -> AssertionSpec {
    let min = expectation.min.map_or(0.0, |v| v as f64);
    let max = expectation.max.map_or(f64::INFINITY, |v| v as f64);
    let mean = expectation.mean.map_or(f64::INFINITY, |v| v as f64);
    let p90 = expectation.ninety_percentile.map_or(f64::INFINITY, |v| v as f64);

    AssertionSpec {
        query: query.to_string(),
        assertions: vec![
            Assertion { metric: Metric::ResponseTimeMin, bound: Bound::AtLeast(min) },
            Assertion { metric: Metric::ResponseTimeMax, bound: Bound::AtMost(max) },
            Assertion { metric: Metric::ResponseTimeMean, bound: Bound::AtMost(mean) },
            Assertion { metric: Metric::ResponseTimeP90, bound: Bound::AtMost(p90) },
            Assertion { metric: Metric::SuccessRate, bound: Bound::AtLeast(100.0) },
        ],
    }
}

impl AssertionSpec {
    /// Evaluate every assertion against the measured stats for this query.
    pub fn evaluate(&self, stats: &QueryStats) -> Vec<AssertionResult> {
        self.assertions
            .iter()
            .map(|assertion| {
                let observed = match assertion.metric {
                    Metric::ResponseTimeMin => stats.min_ms,
                    Metric::ResponseTimeMax => stats.max_ms,
                    Metric::ResponseTimeMean => stats.mean_ms,
                    Metric::ResponseTimeP90 => stats.p90_ms,
                    Metric::SuccessRate => stats.success_rate(),
                };
                AssertionResult {
                    query: self.query.clone(),
                    metric: assertion.metric,
                    bound: assertion.bound,
                    observed,
                    passed: assertion.bound.holds(observed),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(min: f64, max: f64, mean: f64, p90: f64, requests: u64, failures: u64) -> QueryStats {
        QueryStats {
            query: "/api/me".to_string(),
            requests,
            failures,
            min_ms: min,
            max_ms: max,
            mean_ms: mean,
            p90_ms: p90,
        }
    }

    #[test]
    fn test_all_absent_defaults_pass_except_success_floor() {
        let spec = build_assertions("/api/me", &Expectation::default());
        // Arbitrary response times: every threshold is vacuous.
        let results = spec.evaluate(&stats(1.0, 90_000.0, 45_000.0, 80_000.0, 10, 0));
        assert!(results.iter().all(|r| r.passed));

        // One failed request still fails the run through the success floor.
        let results = spec.evaluate(&stats(1.0, 90_000.0, 45_000.0, 80_000.0, 10, 1));
        let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].metric, Metric::SuccessRate);
    }

    #[test]
    fn test_authored_thresholds_are_respected() {
        let expectation = Expectation {
            min: None,
            max: Some(500),
            mean: Some(200),
            ninety_percentile: None,
        };
        let spec = build_assertions("/api/me", &expectation);
        assert_eq!(spec.assertions.len(), 5);
        assert_eq!(spec.assertions[0].bound, Bound::AtLeast(0.0));
        assert_eq!(spec.assertions[1].bound, Bound::AtMost(500.0));
        assert_eq!(spec.assertions[2].bound, Bound::AtMost(200.0));
        assert!(spec.assertions[3].bound.is_unbounded());

        let results = spec.evaluate(&stats(10.0, 450.0, 250.0, 400.0, 100, 0));
        let mean = results
            .iter()
            .find(|r| r.metric == Metric::ResponseTimeMean)
            .unwrap();
        assert!(!mean.passed);
        assert_eq!(mean.observed, 250.0);
        let max = results
            .iter()
            .find(|r| r.metric == Metric::ResponseTimeMax)
            .unwrap();
        assert!(max.passed);
    }

    #[test]
    fn test_success_rate_of_empty_stats_is_zero() {
        let s = stats(0.0, 0.0, 0.0, 0.0, 0, 0);
        assert_eq!(s.success_rate(), 0.0);
    }
}
