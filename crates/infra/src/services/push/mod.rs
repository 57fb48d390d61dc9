mod inmemory;
mod vapid;

pub use inmemory::{InMemoryPushTransport, RecordedDelivery};
pub use vapid::WebPushTransport;
use remindr_domain::{ReminderPayload, SubscriptionInfo};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    /// The push service reported that the subscription expired or never existed
    #[error("Push endpoint is gone")]
    EndpointGone,
    #[error("Push subscription is invalid: {0}")]
    InvalidSubscription(String),
    #[error("Delivery timed out")]
    Timeout,
    #[error("Push transport error: {0}")]
    Transport(String),
}

/// Sends a notification payload to one push endpoint
#[async_trait::async_trait]
pub trait IPushTransport: Send + Sync {
    async fn send(
        &self,
        subscription: &SubscriptionInfo,
        payload: &ReminderPayload,
    ) -> Result<(), DeliveryError>;
}
