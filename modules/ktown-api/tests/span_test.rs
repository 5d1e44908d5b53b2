//! Blocking work spawned for a request keeps the request's span. Runs in
//! its own binary because it installs a global subscriber.

use tracing::{info_span, Instrument, Span};

use ktown_api::rest::spawn_blocking_in_span;

#[tokio::test]
async fn blocking_work_runs_inside_the_request_span() {
    tracing::subscriber::set_global_default(tracing_subscriber::registry()).unwrap();

    let span = info_span!("http_request", method = "POST", path = "/api/world-data");
    let seen = async {
        spawn_blocking_in_span(|| Span::current().metadata().map(|m| m.name()))
            .await
            .unwrap()
    }
    .instrument(span)
    .await;

    assert_eq!(seen, Some("http_request"));
}

#[tokio::test]
async fn blocking_work_outside_a_span_has_none() {
    let seen = spawn_blocking_in_span(|| Span::current().is_none())
        .await
        .unwrap();
    assert!(seen);
}
