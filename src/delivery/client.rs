//! Delivery client abstraction.
//!
//! [`DeliveryClient`] exists for dependency injection: dispatch workers are
//! generic over it, so tests drive the pipeline with an in-memory recorder
//! while production uses [`WebhookClient`] over reqwest.

use super::{DeliveryError, WebhookEnvelope};
use crate::event::ChangeEvent;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Connect timeout for webhook requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Asynchronous event delivery.
pub trait DeliveryClient: Send + Sync + 'static {
    /// Delivers one event to the configured endpoint.
    fn deliver(
        &self,
        event: ChangeEvent,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// Real delivery client POSTing to the aggregator's webhook endpoint.
///
/// The wire format is a form-encoded POST of `payload_json=<envelope JSON>`
/// to `{base_url}/api/webhook?token={auth_token}`. Until both endpoint and
/// credential are configured every delivery is a no-op failure; the client
/// never touches the network unconfigured.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    endpoint: Option<String>,
    auth_token: String,
}

impl WebhookClient {
    /// Creates a client for `base_url` and `auth_token`. Either being empty
    /// leaves the client unconfigured.
    ///
    /// # Arguments
    ///
    /// * `request_timeout_secs` - total per-request timeout
    pub fn new(
        base_url: &str,
        auth_token: &str,
        request_timeout_secs: u64,
    ) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs.max(1)))
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(format!("runetrack/{}", crate::VERSION))
            .build()
            .map_err(|e| DeliveryError::Request(format!("failed to create HTTP client: {e}")))?;

        let mut this = Self {
            client,
            endpoint: None,
            auth_token: String::new(),
        };
        this.configure(base_url, auth_token);
        Ok(this)
    }

    /// Points the client at a new endpoint and credential. Empty values
    /// leave it unconfigured.
    pub fn configure(&mut self, base_url: &str, auth_token: &str) {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() || auth_token.is_empty() {
            self.endpoint = None;
            self.auth_token.clear();
        } else {
            self.endpoint = Some(format!("{base_url}/api/webhook"));
            self.auth_token = auth_token.to_string();
        }
    }

    /// Full endpoint URL (no token), or `None` while unconfigured.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl DeliveryClient for WebhookClient {
    async fn deliver(&self, event: ChangeEvent) -> Result<(), DeliveryError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Err(DeliveryError::NotConfigured);
        };
        let kind = event.kind;
        let envelope = WebhookEnvelope::from_event(event);
        let json = envelope.to_json()?;

        trace!(%kind, endpoint, "Delivering event");

        let response = self
            .client
            .post(endpoint)
            .query(&[("token", self.auth_token.as_str())])
            .form(&[("payload_json", json.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(%kind, error = %e, is_timeout = e.is_timeout(), is_connect = e.is_connect(), "Webhook request failed");
                if e.is_timeout() {
                    DeliveryError::Timeout(e.to_string())
                } else if e.is_connect() {
                    DeliveryError::Connect(e.to_string())
                } else {
                    DeliveryError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%kind, status = status.as_u16(), "Webhook endpoint rejected event");
            return Err(DeliveryError::Status {
                status: status.as_u16(),
            });
        }

        debug!(%kind, status = status.as_u16(), "Event delivered");
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory delivery client recording everything it is asked to send.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingClient {
        pub delivered: Arc<Mutex<Vec<ChangeEvent>>>,
        pub fail: Arc<Mutex<bool>>,
    }

    impl RecordingClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_failing(&self, failing: bool) {
            *self.fail.lock().unwrap() = failing;
        }

        pub fn delivered(&self) -> Vec<ChangeEvent> {
            self.delivered.lock().unwrap().clone()
        }
    }

    impl DeliveryClient for RecordingClient {
        async fn deliver(&self, event: ChangeEvent) -> Result<(), DeliveryError> {
            if *self.fail.lock().unwrap() {
                return Err(DeliveryError::Connect("connection refused".into()));
            }
            self.delivered.lock().unwrap().push(event);
            Ok(())
        }
    }

    #[test]
    fn webhook_client_builds_endpoint_url() {
        let client = WebhookClient::new("https://example.com", "secret", 30).unwrap();
        assert_eq!(client.endpoint(), Some("https://example.com/api/webhook"));

        // Trailing slash on the base URL is tolerated.
        let client = WebhookClient::new("https://example.com/", "secret", 30).unwrap();
        assert_eq!(client.endpoint(), Some("https://example.com/api/webhook"));
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        use crate::event::{EventKind, EventPayload, HeartbeatPayload};

        let client = WebhookClient::new("", "", 30).unwrap();
        assert_eq!(client.endpoint(), None);

        let event = ChangeEvent::new(
            EventKind::Heartbeat,
            "Zezima",
            EventPayload::Heartbeat(HeartbeatPayload {
                status: "online".into(),
            }),
        );
        let err = client.deliver(event).await.unwrap_err();
        assert!(matches!(err, DeliveryError::NotConfigured));
    }

    #[test]
    fn configure_updates_the_endpoint() {
        let mut client = WebhookClient::new("", "", 30).unwrap();
        client.configure("https://example.com", "secret");
        assert_eq!(client.endpoint(), Some("https://example.com/api/webhook"));

        client.configure("", "secret");
        assert_eq!(client.endpoint(), None);
    }

    #[tokio::test]
    async fn recording_client_records() {
        use crate::event::{EventKind, EventPayload, HeartbeatPayload};

        let client = RecordingClient::new();
        let event = ChangeEvent::new(
            EventKind::Heartbeat,
            "Zezima",
            EventPayload::Heartbeat(HeartbeatPayload {
                status: "online".into(),
            }),
        );

        client.deliver(event.clone()).await.unwrap();
        assert_eq!(client.delivered(), vec![event]);
    }

    #[tokio::test]
    async fn repeat_delivery_of_one_event_is_safe() {
        use crate::event::{EventKind, EventPayload, HeartbeatPayload};

        let client = RecordingClient::new();
        let event = ChangeEvent::new(
            EventKind::Heartbeat,
            "Zezima",
            EventPayload::Heartbeat(HeartbeatPayload {
                status: "online".into(),
            }),
        );

        // The pipeline never re-sends an event on purpose, but the client
        // contract must tolerate it.
        client.deliver(event.clone()).await.unwrap();
        client.deliver(event.clone()).await.unwrap();
        assert_eq!(client.delivered().len(), 2);
    }

    #[tokio::test]
    async fn recording_client_fails_on_demand() {
        use crate::event::{EventKind, EventPayload, HeartbeatPayload};

        let client = RecordingClient::new();
        client.set_failing(true);

        let event = ChangeEvent::new(
            EventKind::Heartbeat,
            "Zezima",
            EventPayload::Heartbeat(HeartbeatPayload {
                status: "online".into(),
            }),
        );

        let err = client.deliver(event).await.unwrap_err();
        assert!(err.is_endpoint_failure());
        assert!(client.delivered().is_empty());
    }
}
