use climate_etl::core::fetcher::HttpTransport;
use climate_etl::core::Transport;
use climate_etl::{EtlError, Fetcher, RetryPolicy};
use httpmock::prelude::*;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

fn fetcher(max_attempts: u32, base_delay_ms: u64) -> Fetcher {
    let policy = RetryPolicy::new(max_attempts, Duration::from_millis(base_delay_ms)).unwrap();
    Fetcher::http(policy, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_returns_body_on_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/data.csv");
        then.status(200).body("Year,Event_Type,Count\n1990,Flood,4\n");
    });

    let body = assert_ok!(fetcher(3, 1).fetch(&server.url("/data.csv")).await);

    mock.assert_hits(1);
    assert_eq!(body, b"Year,Event_Type,Count\n1990,Flood,4\n".to_vec());
}

#[tokio::test]
async fn test_non_success_status_retries_until_exhausted() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/missing.csv");
        then.status(404);
    });

    let url = server.url("/missing.csv");
    let failure = assert_err!(fetcher(4, 1).fetch(&url).await);

    mock.assert_hits(4);
    assert_eq!(failure.url, url);
    assert_eq!(failure.attempts, 4);
    assert!(failure.reason.contains("404"), "reason: {}", failure.reason);
}

#[tokio::test]
async fn test_backoff_waits_between_attempts() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/flaky");
        then.status(503);
    });

    // Delays of 20ms then 40ms.
    let started = Instant::now();
    let result = fetcher(3, 20).fetch(&server.url("/flaky")).await;

    assert!(result.is_err());
    assert!(started.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_connection_refused_is_absorbed() {
    // Bind and drop a listener to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{}/gistemp.csv", port);

    let failure = assert_err!(fetcher(2, 1).fetch(&url).await);
    assert_eq!(failure.attempts, 2);

    let error: EtlError = failure.into();
    assert!(matches!(error, EtlError::TransportFailure { .. }));
}

#[tokio::test]
async fn test_transport_reports_status_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(410);
    });

    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    let err = transport.get(&server.url("/gone")).await.unwrap_err();
    assert!(matches!(err, EtlError::ApiError(_)));
}
