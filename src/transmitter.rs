//! ==============================================================================
//! transmitter.rs - push a reading to the collector api
//! ==============================================================================
//!
//! purpose:
//!     one POST per call, classified into a `TransmissionOutcome`.
//!     transport faults and non-201 statuses are outcomes, not errors.
//!     `Err` is reserved for faults outside that taxonomy (e.g. a 201 whose
//!     body carries no usable `id`).
//!
//! relationships:
//!     - used by: reporter.rs (Sending state)
//!     - uses: reqwest (http client with a fixed request timeout)
//!     - sends: domain.rs Reading as the json body
//!
//! ==============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::config::CollectorConfig;
use crate::domain::Reading;

/// classified result of one transmission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransmissionOutcome {
    /// collector stored the reading (201) and returned its id
    Success { id: String },
    /// collector answered with any other status
    Rejected { status: u16, body: String },
    /// no usable http response
    NetworkError(NetworkErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkErrorKind {
    ConnectionRefused,
    TimedOut,
    Other(String),
}

impl TransmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// the operator-facing line for this outcome
impl fmt::Display for TransmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { id } => write!(f, "✓ Data sent successfully (ID: {})", id),
            Self::Rejected { status, body } => write!(f, "✗ Error {}: {}", status, body),
            Self::NetworkError(NetworkErrorKind::ConnectionRefused) => {
                write!(f, "✗ Connection error: Could not reach server")
            }
            Self::NetworkError(NetworkErrorKind::TimedOut) => {
                write!(f, "✗ Timeout: Server did not respond in time")
            }
            Self::NetworkError(NetworkErrorKind::Other(msg)) => {
                write!(f, "✗ Request error: {}", msg)
            }
        }
    }
}

/// one attempt to deliver a reading; no retries inside
pub trait Transmit {
    fn send(&self, reading: &Reading) -> impl Future<Output = Result<TransmissionOutcome>>;
}

/// POSTs readings as json to the collector endpoint
pub struct HttpTransmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransmitter {
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        Self::with_timeout(&config.endpoint, config.timeout())
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build http client")?;

        Ok(Self { client, endpoint: endpoint.to_string() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transmit for HttpTransmitter {
    async fn send(&self, reading: &Reading) -> Result<TransmissionOutcome> {
        // .json() sets Content-Type: application/json
        let response = match self.client.post(&self.endpoint).json(reading).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, endpoint = %self.endpoint, "[HTTP] transport failure");
                return Ok(TransmissionOutcome::NetworkError(classify(&e)));
            }
        };

        // the timeout covers the body too, so a stalled body is a network error
        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, status = status.as_u16(), "[HTTP] body read failure");
                return Ok(TransmissionOutcome::NetworkError(classify(&e)));
            }
        };

        if status != StatusCode::CREATED {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Ok(TransmissionOutcome::Rejected { status: status.as_u16(), body });
        }

        let body: Value = serde_json::from_slice(&bytes)
            .context("Collector returned 201 with a non-json body")?;

        let id = extract_id(&body)?;
        Ok(TransmissionOutcome::Success { id })
    }
}

fn classify(e: &reqwest::Error) -> NetworkErrorKind {
    if e.is_timeout() {
        NetworkErrorKind::TimedOut
    } else if e.is_connect() {
        NetworkErrorKind::ConnectionRefused
    } else {
        NetworkErrorKind::Other(e.to_string())
    }
}

/// collector ids may be json strings or numbers
fn extract_id(body: &Value) -> Result<String> {
    match body.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        Some(other) => Err(anyhow!("Unusable id in collector response: {}", other)),
        None => Err(anyhow!("Collector response has no id: {}", body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WaterSensors;
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::post,
        Json, Router,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn reading() -> Reading {
        Reading {
            water_level: 50.0,
            light_level: 70.0,
            temperature: 21.5,
            humidity: 45.0,
            moisture: 33.0,
            water_sensors: WaterSensors { level_75: false, level_50: true, level_25: true },
        }
    }

    /// serve `router` on an ephemeral port, return the endpoint url
    async fn spawn_collector(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api/sensors", addr)
    }

    fn transmitter(endpoint: &str) -> HttpTransmitter {
        HttpTransmitter::with_timeout(endpoint, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn created_with_string_id_is_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/sensors",
            post(move |headers: HeaderMap, Json(body): Json<Reading>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(headers["content-type"], "application/json");
                    assert_eq!(body, reading());
                    (AxumStatus::CREATED, Json(serde_json::json!({ "id": "abc" })))
                }
            }),
        );
        let endpoint = spawn_collector(router).await;

        let outcome = transmitter(&endpoint).send(&reading()).await.unwrap();
        assert_eq!(outcome, TransmissionOutcome::Success { id: "abc".to_string() });
        assert_eq!(outcome.to_string(), "✓ Data sent successfully (ID: abc)");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn numeric_id_is_accepted() {
        let router = Router::new().route(
            "/api/sensors",
            post(|| async { (AxumStatus::CREATED, Json(serde_json::json!({ "id": 42 }))) }),
        );
        let endpoint = spawn_collector(router).await;

        let outcome = transmitter(&endpoint).send(&reading()).await.unwrap();
        assert_eq!(outcome, TransmissionOutcome::Success { id: "42".to_string() });
    }

    #[tokio::test]
    async fn server_error_is_rejected_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/sensors",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (AxumStatus::INTERNAL_SERVER_ERROR, "database unavailable")
                }
            }),
        );
        let endpoint = spawn_collector(router).await;

        let outcome = transmitter(&endpoint).send(&reading()).await.unwrap();
        assert_eq!(
            outcome,
            TransmissionOutcome::Rejected { status: 500, body: "database unavailable".to_string() }
        );
        assert_eq!(outcome.to_string(), "✗ Error 500: database unavailable");
        assert_eq!(hits.load(Ordering::SeqCst), 1, "no internal retries");
    }

    #[tokio::test]
    async fn ok_instead_of_created_is_rejected() {
        let router = Router::new().route(
            "/api/sensors",
            post(|| async { (AxumStatus::OK, Json(serde_json::json!({ "id": "abc" }))) }),
        );
        let endpoint = spawn_collector(router).await;

        let outcome = transmitter(&endpoint).send(&reading()).await.unwrap();
        assert!(matches!(outcome, TransmissionOutcome::Rejected { status: 200, .. }));
    }

    #[tokio::test]
    async fn created_without_id_is_unexpected() {
        let router = Router::new().route(
            "/api/sensors",
            post(|| async { (AxumStatus::CREATED, Json(serde_json::json!({ "ok": true }))) }),
        );
        let endpoint = spawn_collector(router).await;

        let err = transmitter(&endpoint).send(&reading()).await.unwrap_err();
        assert!(err.to_string().contains("no id"));
    }

    #[tokio::test]
    async fn created_with_plain_text_is_unexpected() {
        let router = Router::new()
            .route("/api/sensors", post(|| async { (AxumStatus::CREATED, "stored") }));
        let endpoint = spawn_collector(router).await;

        assert!(transmitter(&endpoint).send(&reading()).await.is_err());
    }

    #[tokio::test]
    async fn closed_port_is_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = format!("http://{}/api/sensors", addr);
        let outcome = transmitter(&endpoint).send(&reading()).await.unwrap();
        assert_eq!(outcome, TransmissionOutcome::NetworkError(NetworkErrorKind::ConnectionRefused));
        assert_eq!(outcome.to_string(), "✗ Connection error: Could not reach server");
    }

    #[tokio::test]
    async fn slow_collector_times_out() {
        let router = Router::new().route(
            "/api/sensors",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                AxumStatus::CREATED
            }),
        );
        let endpoint = spawn_collector(router).await;

        let tx = HttpTransmitter::with_timeout(&endpoint, Duration::from_millis(200)).unwrap();
        let outcome = tx.send(&reading()).await.unwrap();
        assert_eq!(outcome, TransmissionOutcome::NetworkError(NetworkErrorKind::TimedOut));
    }

    /// raw collector that sends a status line and headers, then goes quiet
    async fn spawn_stalling_collector(status_line: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{{\"id\":",
                status_line
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        format!("http://{}/api/sensors", addr)
    }

    #[tokio::test]
    async fn stalled_created_body_is_timeout() {
        let endpoint = spawn_stalling_collector("HTTP/1.1 201 Created").await;

        let tx = HttpTransmitter::with_timeout(&endpoint, Duration::from_millis(300)).unwrap();
        let outcome = tx.send(&reading()).await.unwrap();
        assert_eq!(outcome, TransmissionOutcome::NetworkError(NetworkErrorKind::TimedOut));
    }

    #[tokio::test]
    async fn stalled_error_body_is_timeout_not_rejection() {
        let endpoint = spawn_stalling_collector("HTTP/1.1 500 Internal Server Error").await;

        let tx = HttpTransmitter::with_timeout(&endpoint, Duration::from_millis(300)).unwrap();
        let outcome = tx.send(&reading()).await.unwrap();
        assert_eq!(outcome, TransmissionOutcome::NetworkError(NetworkErrorKind::TimedOut));
    }

    #[test]
    fn extract_id_rejects_null_and_objects() {
        assert!(extract_id(&serde_json::json!({ "id": null })).is_err());
        assert!(extract_id(&serde_json::json!({ "id": { "n": 1 } })).is_err());
        assert_eq!(extract_id(&serde_json::json!({ "id": "x1" })).unwrap(), "x1");
    }
}
