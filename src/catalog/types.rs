use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Top-level shape of a catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// One declarative test case: the query to exercise plus the constraints,
/// expectations and data dependencies attached to it.
///
/// Scenarios are constructed once at catalog-load time and never mutated;
/// every downstream component borrows them from the loaded catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Request path+query to exercise. Also the name used for logging and
    /// assertion reporting. Not required to be unique across the catalog;
    /// a duplicated query simply runs twice.
    pub query: String,
    /// Inclusive bounds on the target-system versions this scenario applies
    /// to. Absent means the scenario always applies.
    #[serde(default)]
    pub version: Option<VersionRange>,
    /// Named expectation profiles (e.g. `"baseline"`) for this scenario.
    #[serde(default)]
    pub expectations: HashMap<String, Expectation>,
    /// Data-setup steps applied before load injection, in declared order.
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
}

/// Inclusive `[min, max]` bounds on supported target-system versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct VersionRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Response-time thresholds for one scenario/profile pair, in milliseconds,
/// exactly as authored. Absent fields are defaulted by the assertion
/// builder, not here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Expectation {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub mean: Option<u64>,
    #[serde(rename = "ninetyPercentile")]
    pub ninety_percentile: Option<u64>,
}

/// One idempotent data-setup step: POST `resource` to `on_create_path`,
/// falling back to PUT on `on_conflict_path` when the create reports 409.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// Opaque JSON document passed through to the target API unmodified.
    pub resource: Value,
    pub on_create_path: String,
    pub on_conflict_path: String,
}
