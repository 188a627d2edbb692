//! Integration tests for WeatherClient against a mock forecast provider.

mod common;

use common::{first_day, forecast_body, valid_body};
use meteodash::{LatLon, RetryConfig, WeatherClient, WeatherClientError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOCATION: LatLon = LatLon(38.2469, -85.7664);

fn client(server: &MockServer, cache_dir: &std::path::Path, retry: RetryConfig) -> WeatherClient {
    WeatherClient::builder()
        .cache_dir(cache_dir.to_path_buf())
        .base_url(server.uri())
        .retry(retry)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_fetch_today_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("past_days", "31"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .and(query_param("timezone", "America/New_York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(valid_body(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = client(&mock_server, cache.path(), RetryConfig::none());
    let snapshot = client.fetch_today(LOCATION).await.unwrap();

    assert_eq!(snapshot.daily.height(), 3);
    assert_eq!(snapshot.hourly.height(), 72);

    let daily = snapshot.daily.records().unwrap();
    assert_eq!(daily[0].date, first_day());
    // Rounded to two decimals
    assert_eq!(daily[0].temperature_max, Some(40.13));
    // Kept at full precision
    assert_eq!(daily[0].relative_humidity_mean, Some(48.125));

    let hourly = snapshot.hourly.records().unwrap();
    assert_eq!(hourly[1].temperature, Some(0.13));
    assert_eq!(hourly[1].relative_humidity, Some(0.125));
}

#[tokio::test]
async fn test_second_fetch_served_from_response_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(valid_body(2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = client(&mock_server, cache.path(), RetryConfig::none());
    let first = client.fetch_for_date(LOCATION, first_day()).await.unwrap();
    let second = client.fetch_for_date(LOCATION, first_day()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cached_response_not_reused_on_next_day() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(valid_body(2)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(valid_body(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = client(&mock_server, cache.path(), RetryConfig::none());
    let next_day = first_day().succ_opt().unwrap();

    let first = client.fetch_for_date(LOCATION, first_day()).await.unwrap();
    let second = client.fetch_for_date(LOCATION, next_day).await.unwrap();
    assert_eq!(first.daily.height(), 2);
    assert_eq!(second.daily.height(), 3);

    // Both days stay cached independently.
    let again = client.fetch_for_date(LOCATION, first_day()).await.unwrap();
    assert_eq!(again, first);
}

#[tokio::test]
async fn test_expired_cache_refetches() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(valid_body(2)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = WeatherClient::builder()
        .cache_dir(cache.path().to_path_buf())
        .base_url(mock_server.uri())
        .cache_ttl(Duration::ZERO)
        .build()
        .unwrap();
    client.fetch_today(LOCATION).await.unwrap();
    client.fetch_today(LOCATION).await.unwrap();
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(valid_body(2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = client(&mock_server, cache.path(), RetryConfig::new(3, 1, 5));
    let snapshot = client.fetch_today(LOCATION).await.unwrap();
    assert_eq!(snapshot.daily.height(), 2);
}

#[tokio::test]
async fn test_retry_exhaustion_is_provider_unavailable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = client(&mock_server, cache.path(), RetryConfig::new(2, 1, 5));
    let err = client.fetch_today(LOCATION).await.unwrap_err();
    assert!(
        matches!(err, WeatherClientError::ProviderUnavailable { attempts: 3, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_bad_request_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°. Given: 138.2."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = client(&mock_server, cache.path(), RetryConfig::new(3, 1, 5));
    let err = client.fetch_today(LatLon(138.2, -85.7)).await.unwrap_err();
    match err {
        WeatherClientError::ProviderRejected { status, reason, .. } => {
            assert_eq!(status.as_u16(), 400);
            assert!(reason.starts_with("Latitude must be in range"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_variable_order_mismatch_is_schema_error_and_not_cached() {
    let mock_server = MockServer::start().await;
    let reordered = [
        "wind_speed_10m",
        "temperature_2m",
        "wind_direction_10m",
        "relative_humidity_2m",
    ];
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(2, &reordered)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = client(&mock_server, cache.path(), RetryConfig::none());
    for _ in 0..2 {
        let err = client.fetch_today(LOCATION).await.unwrap_err();
        assert!(matches!(err, WeatherClientError::SchemaMismatch { .. }));
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let cache = tempdir().unwrap();
    let client = client(&mock_server, cache.path(), RetryConfig::none());
    let err = client.fetch_today(LOCATION).await.unwrap_err();
    assert!(matches!(err, WeatherClientError::ResponseParse(_)));
}

/// Serves `body` over plain HTTP/1.1, cutting the first `truncated` responses
/// off after 10 bytes even though the full `content-length` is announced.
async fn serve_truncated(body: String, truncated: usize) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            let payload = if attempt < truncated {
                &body.as_bytes()[..10]
            } else {
                body.as_bytes()
            };
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(payload).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", addr), hits)
}

fn raw_client(base_url: String, cache_dir: &std::path::Path, retry: RetryConfig) -> WeatherClient {
    WeatherClient::builder()
        .cache_dir(cache_dir.to_path_buf())
        .base_url(base_url)
        .retry(retry)
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_truncated_body_is_retried() {
    let (base_url, hits) = serve_truncated(valid_body(2).to_string(), 1).await;

    let cache = tempdir().unwrap();
    let client = raw_client(base_url, cache.path(), RetryConfig::new(3, 1, 5));
    let snapshot = client.fetch_for_date(LOCATION, first_day()).await.unwrap();

    assert_eq!(snapshot.daily.height(), 2);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_truncated_body_exhaustion_is_provider_unavailable() {
    let (base_url, hits) = serve_truncated(valid_body(2).to_string(), usize::MAX).await;

    let cache = tempdir().unwrap();
    let client = raw_client(base_url, cache.path(), RetryConfig::new(1, 1, 5));
    let err = client.fetch_for_date(LOCATION, first_day()).await.unwrap_err();

    assert!(
        matches!(err, WeatherClientError::ProviderUnavailable { attempts: 2, .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
