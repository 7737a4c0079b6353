use stampede::assertions::build_assertions;
use stampede::catalog::Expectation;
use stampede::engine::{BlockingLoadEngine, LoadEngine};
use stampede::plan::{InjectionProfile, LoadUnit, ProtocolProfile};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock target answering every request with 200, recording paths seen.
fn spawn_ok_server() -> (String, Arc<AtomicUsize>, Arc<Mutex<Vec<String>>>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}", server.server_addr().to_ip().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let paths = Arc::new(Mutex::new(Vec::new()));

    let hits_counter = Arc::clone(&hits);
    let paths_log = Arc::clone(&paths);
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            hits_counter.fetch_add(1, Ordering::SeqCst);
            paths_log.lock().unwrap().push(request.url().to_string());
            let _ = request.respond(tiny_http::Response::empty(200));
        }
    });

    (base, hits, paths)
}

fn unit(query: &str, duration_ms: u64) -> LoadUnit {
    LoadUnit {
        name: query.to_string(),
        query: query.to_string(),
        injection: InjectionProfile::Constant {
            users: 1,
            duration: Duration::from_millis(duration_ms),
        },
        inert: false,
    }
}

#[test]
fn test_run_measures_and_evaluates() {
    let (base, hits, _paths) = spawn_ok_server();
    let protocol = ProtocolProfile::new(&base, "admin", "secret", None).unwrap();
    let engine = BlockingLoadEngine::new();

    let units = vec![unit("/api/me", 200)];
    let expectation = Expectation { max: Some(60_000), ..Default::default() };
    let assertions = vec![build_assertions("/api/me", &expectation)];

    let verdict = engine.run(&units, &assertions, &protocol).unwrap();
    assert!(verdict.pass);
    assert!(hits.load(Ordering::SeqCst) >= 1);

    assert_eq!(verdict.stats.len(), 1);
    let stats = &verdict.stats[0];
    assert_eq!(stats.query, "/api/me");
    assert!(stats.requests >= 1);
    assert_eq!(stats.failures, 0);
    assert!(stats.min_ms <= stats.p90_ms);
    assert!(stats.p90_ms <= stats.max_ms);

    // Five assertions, all evaluated.
    assert_eq!(verdict.per_assertion.len(), 5);
}

#[test]
fn test_failed_requests_break_the_success_floor() {
    // No server listening: every request fails at the transport level.
    let protocol = ProtocolProfile::new("http://127.0.0.1:9", "admin", "secret", None).unwrap();
    let engine = BlockingLoadEngine::new();

    let units = vec![unit("/api/me", 50)];
    let assertions = vec![build_assertions("/api/me", &Expectation::default())];

    let verdict = engine.run(&units, &assertions, &protocol).unwrap();
    assert!(!verdict.pass);
    let stats = &verdict.stats[0];
    assert_eq!(stats.requests, stats.failures);
}

#[test]
fn test_warmup_request_is_sent_first_and_unmeasured() {
    let (base, _hits, paths) = spawn_ok_server();
    let protocol =
        ProtocolProfile::new(&base, "admin", "secret", Some("/api/ping".to_string())).unwrap();
    let engine = BlockingLoadEngine::new();

    let units = vec![unit("/api/me", 50)];
    let assertions = vec![build_assertions("/api/me", &Expectation::default())];
    let verdict = engine.run(&units, &assertions, &protocol).unwrap();
    assert!(verdict.pass);

    let paths = paths.lock().unwrap();
    assert_eq!(paths[0], "/api/ping");
    // Warm-up does not count toward the measured requests.
    let measured = verdict.stats[0].requests as usize;
    assert_eq!(paths.len(), measured + 1);
}

#[test]
fn test_inert_unit_is_a_single_request_against_the_base() {
    let (base, hits, paths) = spawn_ok_server();
    let protocol = ProtocolProfile::new(&base, "admin", "secret", None).unwrap();
    let engine = BlockingLoadEngine::new();

    let units = vec![stampede::plan::inert_unit()];
    let verdict = engine.run(&units, &[], &protocol).unwrap();
    assert!(verdict.pass);
    assert!(verdict.per_assertion.is_empty());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(paths.lock().unwrap()[0], "/");
}
