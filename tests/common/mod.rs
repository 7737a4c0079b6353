#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Creates a temporary catalog file with a guaranteed unique name.
    pub fn create_temp_catalog(content: &str, ext: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let path = std::env::temp_dir().join(format!(
            "stampede_test_{}_{}_{}.{}",
            std::process::id(),
            counter,
            nanos,
            ext
        ));

        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_catalog(content, "json")
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_catalog(content, "yaml")
    }

    /// Cleanup temporary files (best effort).
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub mod fakes {
    use serde_json::Value;
    use stampede::assertions::AssertionSpec;
    use stampede::engine::{LoadEngine, RunVerdict};
    use stampede::fixtures::{HttpError, HttpFixtureClient};
    use stampede::plan::{LoadUnit, ProtocolProfile};
    use std::sync::Mutex;

    /// Fixture client that records every call and answers from a script.
    ///
    /// The script is a list of status codes consumed in order across all
    /// calls; 2xx means success, anything else is an `HttpError::Status`.
    pub struct ScriptedFixtureClient {
        pub calls: Mutex<Vec<(String, String, Value)>>,
        script: Mutex<Vec<u16>>,
    }

    impl ScriptedFixtureClient {
        pub fn new(script: Vec<u16>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                script: Mutex::new(script),
            }
        }

        fn respond(&self, verb: &str, path: &str, resource: &Value) -> Result<(), HttpError> {
            self.calls
                .lock()
                .unwrap()
                .push((verb.to_string(), path.to_string(), resource.clone()));
            let status = {
                let mut script = self.script.lock().unwrap();
                if script.is_empty() {
                    200
                } else {
                    script.remove(0)
                }
            };
            if (200..300).contains(&status) {
                Ok(())
            } else {
                Err(HttpError::Status { status, body: String::new() })
            }
        }
    }

    impl HttpFixtureClient for ScriptedFixtureClient {
        fn create(&self, path: &str, resource: &Value) -> Result<(), HttpError> {
            self.respond("POST", path, resource)
        }

        fn update(&self, path: &str, resource: &Value) -> Result<(), HttpError> {
            self.respond("PUT", path, resource)
        }
    }

    /// Engine that captures the submitted plan and evaluates every
    /// assertion against fixed, always-healthy stats.
    pub struct CapturingEngine {
        pub submitted: Mutex<Option<(Vec<LoadUnit>, Vec<AssertionSpec>)>>,
        /// Observed response time applied to min/max/mean/p90, in ms.
        pub observed_ms: f64,
    }

    impl CapturingEngine {
        pub fn new(observed_ms: f64) -> Self {
            Self { submitted: Mutex::new(None), observed_ms }
        }
    }

    impl LoadEngine for CapturingEngine {
        fn run(
            &self,
            units: &[LoadUnit],
            assertions: &[AssertionSpec],
            _protocol: &ProtocolProfile,
        ) -> anyhow::Result<RunVerdict> {
            *self.submitted.lock().unwrap() = Some((units.to_vec(), assertions.to_vec()));

            let mut per_assertion = Vec::new();
            let mut stats = Vec::new();
            for spec in assertions {
                let measured = stampede::assertions::QueryStats {
                    query: spec.query.clone(),
                    requests: 100,
                    failures: 0,
                    min_ms: self.observed_ms,
                    max_ms: self.observed_ms,
                    mean_ms: self.observed_ms,
                    p90_ms: self.observed_ms,
                };
                per_assertion.extend(spec.evaluate(&measured));
                stats.push(measured);
            }
            let pass = per_assertion.iter().all(|r| r.passed);
            Ok(RunVerdict { pass, per_assertion, stats })
        }
    }
}
