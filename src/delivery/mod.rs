//! Webhook delivery.
//!
//! The last hop of the pipeline: a [`ChangeEvent`] is wrapped in a
//! [`WebhookEnvelope`], serialized, and POSTed to the aggregator's webhook
//! endpoint by a [`DeliveryClient`]. Delivery is best-effort: a failed send
//! is logged and counted, never retried by this layer (reconciliation
//! re-converges state on its own schedule).
//!
//! [`ChangeEvent`]: crate::event::ChangeEvent

pub mod client;
pub mod payload;

pub use client::{DeliveryClient, WebhookClient};
pub use payload::WebhookEnvelope;

use thiserror::Error;

/// Errors produced while delivering an event.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The client has no endpoint configured.
    #[error("webhook endpoint not configured")]
    NotConfigured,

    /// The request could not be built or the client could not be created.
    #[error("failed to build request: {0}")]
    Request(String),

    /// The connection could not be established.
    #[error("failed to connect to webhook endpoint: {0}")]
    Connect(String),

    /// The request timed out.
    #[error("webhook request timed out: {0}")]
    Timeout(String),

    /// The endpoint answered with a non-success status.
    #[error("webhook endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// The event payload could not be serialized.
    #[error("failed to serialize event payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DeliveryError {
    /// True for failures worth counting against sync health (the endpoint
    /// is unreachable or rejecting), false for local bugs.
    pub fn is_endpoint_failure(&self) -> bool {
        matches!(
            self,
            DeliveryError::Connect(_) | DeliveryError::Timeout(_) | DeliveryError::Status { .. }
        )
    }
}
