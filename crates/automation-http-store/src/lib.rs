//! Automation HTTP Store - persists designer automations over REST
//!
//! Implements `flow_designer::AutomationStore` against the automation API:
//!
//! - `POST {base}/automations` creates (no id yet)
//! - `PUT {base}/automations/{id}` updates
//! - `GET {base}/automations/{id}` fetches
//!
//! Every response is wrapped as `{success, data, error}`.

pub mod config;
pub mod error;

use std::time::Duration;

use async_trait::async_trait;
use flow_designer::{AutomationStore, SaveRequest, StoreError};
use serde::Deserialize;
use serde_json::Value;

pub use config::HttpStoreConfig;
pub use error::{HttpStoreError, Result};

/// Response wrapper used by every API endpoint
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

/// `AutomationStore` backed by the automation REST API
#[derive(Debug, Clone)]
pub struct HttpAutomationStore {
    config: HttpStoreConfig,
    http_client: reqwest::Client,
}

impl HttpAutomationStore {
    pub fn new(config: HttpStoreConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    /// Create or update; returns the automation id
    pub async fn put_automation(&self, request: &SaveRequest) -> Result<String> {
        let builder = match request.id() {
            Some(id) => self.http_client.put(self.config.automation_url(id)?),
            None => self.http_client.post(self.config.automations_url()?),
        };
        log::debug!(
            "{} automation '{}'",
            if request.is_update() { "Updating" } else { "Creating" },
            request.document.meta.name
        );

        let data = Self::read_envelope(builder.json(&request.document).send().await?).await?;
        match data.get("id") {
            Some(Value::String(id)) => Ok(id.clone()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => request
                .id()
                .map(str::to_string)
                .ok_or(HttpStoreError::MissingId),
        }
    }

    /// Fetch the stored payload
    pub async fn get_automation(&self, id: &str) -> Result<Value> {
        let response = self
            .http_client
            .get(self.config.automation_url(id)?)
            .send()
            .await?;
        Self::read_envelope(response).await
    }

    async fn read_envelope(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().await?;
        parse_envelope(status.as_u16(), &body)
    }
}

/// Unwrap `{success, data, error}`, preferring the API's own message
fn parse_envelope(status: u16, body: &str) -> Result<Value> {
    let envelope = serde_json::from_str::<ApiEnvelope>(body);
    let success_status = (200..300).contains(&status);

    match envelope {
        Ok(envelope) if !success_status => Err(HttpStoreError::Status {
            status,
            message: envelope
                .error
                .unwrap_or_else(|| "API request failed".to_string()),
        }),
        Ok(envelope) if !envelope.success => Err(HttpStoreError::Api(
            envelope
                .error
                .unwrap_or_else(|| "API request failed".to_string()),
        )),
        Ok(envelope) => Ok(envelope.data),
        Err(_) if !success_status => Err(HttpStoreError::Status {
            status,
            message: body.trim().to_string(),
        }),
        Err(e) => Err(HttpStoreError::Decode(e.to_string())),
    }
}

#[async_trait]
impl AutomationStore for HttpAutomationStore {
    async fn save(&self, request: &SaveRequest) -> std::result::Result<String, StoreError> {
        self.put_automation(request).await.map_err(|e| {
            log::warn!("Saving automation failed: {}", e);
            StoreError::from(e)
        })
    }

    async fn fetch(&self, id: &str) -> std::result::Result<Value, StoreError> {
        self.get_automation(id).await.map_err(StoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_designer::{AutomationDocument, AutomationMeta};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer exactly one HTTP request with `status` and `body`; the handle
    /// yields the raw request text
    async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api/v1", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                raw.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });
        (base, handle)
    }

    fn request(id: Option<&str>) -> SaveRequest {
        SaveRequest {
            document: AutomationDocument {
                id: id.map(str::to_string),
                meta: AutomationMeta {
                    name: "Porch light".into(),
                    ..Default::default()
                },
                rules: Default::default(),
                layout: None,
            },
        }
    }

    #[test]
    fn test_parse_envelope() {
        assert_eq!(
            parse_envelope(200, r#"{"success": true, "data": {"id": "a1"}}"#).unwrap(),
            json!({"id": "a1"})
        );
        assert!(matches!(
            parse_envelope(200, r#"{"success": false, "error": "name required"}"#),
            Err(HttpStoreError::Api(msg)) if msg == "name required"
        ));
        assert!(matches!(
            parse_envelope(500, "upstream exploded"),
            Err(HttpStoreError::Status { status: 500, message }) if message == "upstream exploded"
        ));
        assert!(matches!(
            parse_envelope(404, r#"{"success": false, "error": "Automation not found"}"#),
            Err(HttpStoreError::Status { status: 404, .. })
        ));
        assert!(matches!(
            parse_envelope(200, "<html>"),
            Err(HttpStoreError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_create_posts_document() {
        let (base, server) = serve_once(
            "201 Created",
            json!({"success": true, "data": {"id": "auto-9", "name": "Porch light"}}).to_string(),
        )
        .await;
        let store = HttpAutomationStore::new(HttpStoreConfig::new(base)).unwrap();

        let id = store.save(&request(None)).await.unwrap();
        assert_eq!(id, "auto-9");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/v1/automations HTTP/1.1"), "{}", raw);
        assert!(raw.contains(r#""name":"Porch light""#));
        assert!(raw.contains(r#""triggers":[]"#));
    }

    #[tokio::test]
    async fn test_update_puts_to_id() {
        let (base, server) = serve_once(
            "200 OK",
            json!({"success": true, "data": {"updated": true}}).to_string(),
        )
        .await;
        let store = HttpAutomationStore::new(HttpStoreConfig::new(base)).unwrap();

        let id = store.save(&request(Some("auto-9"))).await.unwrap();
        assert_eq!(id, "auto-9");
        let raw = server.await.unwrap();
        assert!(raw.starts_with("PUT /api/v1/automations/auto-9 HTTP/1.1"), "{}", raw);
    }

    #[tokio::test]
    async fn test_rejection_maps_to_store_error() {
        let (base, _server) = serve_once(
            "400 Bad Request",
            json!({"success": false, "error": "invalid trigger"}).to_string(),
        )
        .await;
        let store = HttpAutomationStore::new(HttpStoreConfig::new(base)).unwrap();

        let err = store.save(&request(None)).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Rejected("API returned 400: invalid trigger".into())
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_data() {
        let (base, server) = serve_once(
            "200 OK",
            json!({"success": true, "data": {"id": "a1", "name": "Night", "triggers": []}})
                .to_string(),
        )
        .await;
        let store = HttpAutomationStore::new(HttpStoreConfig::new(base)).unwrap();

        let payload = store.fetch("a1").await.unwrap();
        assert_eq!(payload["name"], "Night");
        assert!(server
            .await
            .unwrap()
            .starts_with("GET /api/v1/automations/a1 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_fetch_escapes_id() {
        let (base, server) = serve_once(
            "200 OK",
            json!({"success": true, "data": {"id": "a/b?c"}}).to_string(),
        )
        .await;
        let store = HttpAutomationStore::new(HttpStoreConfig::new(base)).unwrap();

        store.fetch("a/b?c").await.unwrap();
        let raw = server.await.unwrap();
        assert!(
            raw.starts_with("GET /api/v1/automations/a%2Fb%3Fc HTTP/1.1"),
            "{}",
            raw
        );
    }

    #[tokio::test]
    async fn test_unreachable_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store =
            HttpAutomationStore::new(HttpStoreConfig::new(format!("http://{}/api/v1", addr)))
                .unwrap();
        assert!(matches!(
            store.save(&request(None)).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
