//! Load-engine seam and the bundled blocking executor.
//!
//! The orchestration core only needs the [`LoadEngine`] capability: take
//! the planned units and assertions, inject the traffic, measure response
//! times and success rate, and report a verdict. The call is blocking and
//! the core issues no cancellation mid-run.
//!
//! [`BlockingLoadEngine`] is the bundled implementation: a closed-model
//! executor over reqwest's blocking client. One OS thread per virtual
//! user loops requests against the unit's query until the injection
//! deadline, recording a latency sample per request. It is an adapter over
//! reqwest, not an HTTP stack; swap in another engine at the trait seam.

use crate::assertions::{AssertionResult, AssertionSpec, QueryStats};
use crate::plan::{InjectionProfile, LoadUnit, ProtocolProfile};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Result of one executed run: the overall pass flag, every per-assertion
/// outcome, and the measured stats per query.
#[derive(Debug, Clone, PartialEq)]
pub struct RunVerdict {
    pub pass: bool,
    pub per_assertion: Vec<AssertionResult>,
    pub stats: Vec<QueryStats>,
}

/// External load-generation capability consumed by the orchestrator.
pub trait LoadEngine {
    fn run(
        &self,
        units: &[LoadUnit],
        assertions: &[AssertionSpec],
        protocol: &ProtocolProfile,
    ) -> anyhow::Result<RunVerdict>;
}

/// One measured request.
#[derive(Debug, Clone, Copy)]
struct Sample {
    latency_ms: f64,
    ok: bool,
}

/// Bundled closed-model blocking executor.
#[derive(Debug, Default)]
pub struct BlockingLoadEngine;

impl BlockingLoadEngine {
    pub fn new() -> Self {
        Self
    }
}

impl LoadEngine for BlockingLoadEngine {
    fn run(
        &self,
        units: &[LoadUnit],
        assertions: &[AssertionSpec],
        protocol: &ProtocolProfile,
    ) -> anyhow::Result<RunVerdict> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(protocol.user_agent.clone())
            .pool_max_idle_per_host(protocol.max_connections_per_host)
            .build()?;

        if let Some(path) = &protocol.warmup_path {
            let sample = perform_request(&client, protocol, &protocol.url_for(path));
            info!(
                "warm-up request to '{}' took {:.0} ms (ok: {})",
                path, sample.latency_ms, sample.ok
            );
        }

        // Units sharing a query contribute to one merged stats record,
        // preserving first-seen unit order.
        let mut order: Vec<String> = Vec::new();
        let mut samples_by_query: HashMap<String, Vec<Sample>> = HashMap::new();
        for unit in units {
            info!("injecting load for '{}'", unit.name);
            let samples = execute_unit(&client, protocol, unit);
            if !samples_by_query.contains_key(&unit.name) {
                order.push(unit.name.clone());
            }
            samples_by_query.entry(unit.name.clone()).or_default().extend(samples);
        }

        let stats: Vec<QueryStats> = order
            .iter()
            .map(|query| summarize(query, &samples_by_query[query]))
            .collect();

        let empty = Vec::new();
        let mut per_assertion = Vec::new();
        for spec in assertions {
            let measured = match stats.iter().find(|s| s.query == spec.query) {
                Some(measured) => measured.clone(),
                None => {
                    warn!("no measurements recorded for '{}'", spec.query);
                    summarize(&spec.query, &empty)
                }
            };
            per_assertion.extend(spec.evaluate(&measured));
        }

        let pass = per_assertion.iter().all(|r| r.passed);
        Ok(RunVerdict { pass, per_assertion, stats })
    }
}

fn execute_unit(
    client: &reqwest::blocking::Client,
    protocol: &ProtocolProfile,
    unit: &LoadUnit,
) -> Vec<Sample> {
    if unit.inert {
        // Single trivial request against the base URL; its outcome carries
        // no pass/fail meaning.
        return vec![perform_request(client, protocol, &protocol.url_for(&unit.query))];
    }

    let (users, ramp, sustain) = match unit.injection {
        InjectionProfile::Constant { users, duration } => (users, Duration::ZERO, duration),
        InjectionProfile::Ramp { users, ramp, hold } => (users, ramp, hold),
    };

    let url = protocol.url_for(&unit.query);
    let deadline = Instant::now() + ramp + sustain;

    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        for user in 0..users.max(1) {
            let url = &url;
            // Stagger user starts across the ramp window.
            let delay = if users > 1 {
                ramp.mul_f64(f64::from(user) / f64::from(users))
            } else {
                Duration::ZERO
            };
            handles.push(scope.spawn(move || {
                std::thread::sleep(delay);
                let mut samples = Vec::new();
                // Every user issues at least one request.
                loop {
                    samples.push(perform_request(client, protocol, url));
                    if Instant::now() >= deadline {
                        break;
                    }
                }
                samples
            }));
        }
        drain_workers(handles.into_iter().map(|handle| handle.join()), &unit.name)
    })
}

/// Collect every worker's samples. A panicked worker is recorded as one
/// failed request so the success floor surfaces it instead of the run
/// understating its request count and passing anyway.
fn drain_workers(
    results: impl IntoIterator<Item = std::thread::Result<Vec<Sample>>>,
    unit_name: &str,
) -> Vec<Sample> {
    let mut samples = Vec::new();
    for result in results {
        match result {
            Ok(worker_samples) => samples.extend(worker_samples),
            Err(_) => {
                warn!("virtual user thread for '{unit_name}' panicked, counting one failure");
                samples.push(Sample { latency_ms: 0.0, ok: false });
            }
        }
    }
    samples
}

fn perform_request(
    client: &reqwest::blocking::Client,
    protocol: &ProtocolProfile,
    url: &str,
) -> Sample {
    let started = Instant::now();
    let ok = client
        .get(url)
        .basic_auth(&protocol.username, Some(&protocol.password))
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map(|response| response.status().is_success())
        .unwrap_or(false);
    Sample {
        latency_ms: started.elapsed().as_secs_f64() * 1000.0,
        ok,
    }
}

/// Collapse raw samples into the stats record assertions are checked
/// against. The 90th percentile uses the nearest-rank method.
fn summarize(query: &str, samples: &[Sample]) -> QueryStats {
    if samples.is_empty() {
        return QueryStats {
            query: query.to_string(),
            requests: 0,
            failures: 0,
            min_ms: 0.0,
            max_ms: 0.0,
            mean_ms: 0.0,
            p90_ms: 0.0,
        };
    }

    let mut latencies: Vec<f64> = samples.iter().map(|s| s.latency_ms).collect();
    latencies.sort_by(|a, b| a.total_cmp(b));

    let requests = samples.len() as u64;
    let failures = samples.iter().filter(|s| !s.ok).count() as u64;
    let rank = ((0.9 * latencies.len() as f64).ceil() as usize).clamp(1, latencies.len());

    QueryStats {
        query: query.to_string(),
        requests,
        failures,
        min_ms: latencies[0],
        max_ms: latencies[latencies.len() - 1],
        mean_ms: latencies.iter().sum::<f64>() / latencies.len() as f64,
        p90_ms: latencies[rank - 1],
    }
}
