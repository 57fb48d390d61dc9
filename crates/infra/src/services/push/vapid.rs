use super::{DeliveryError, IPushTransport};
use crate::config::VapidConfig;
use ::web_push::{
    ContentEncoding, IsahcWebPushClient, VapidSignatureBuilder, WebPushClient, WebPushError,
    WebPushMessageBuilder,
};
use remindr_domain::{ReminderPayload, SubscriptionInfo};

/// Delivers encrypted web push messages signed with the configured VAPID key
pub struct WebPushTransport {
    client: IsahcWebPushClient,
    vapid: VapidConfig,
    ttl: u32,
}

impl WebPushTransport {
    pub fn new(vapid: VapidConfig, ttl: u32) -> anyhow::Result<Self> {
        let client = IsahcWebPushClient::new()
            .map_err(|e| anyhow::Error::msg(format!("Unable to create push client: {}", e)))?;
        Ok(Self { client, vapid, ttl })
    }
}

fn to_delivery_error(e: WebPushError) -> DeliveryError {
    match e {
        WebPushError::EndpointNotValid { .. } | WebPushError::EndpointNotFound { .. } => {
            DeliveryError::EndpointGone
        }
        WebPushError::MissingCryptoKeys { .. } | WebPushError::InvalidCryptoKeys { .. } => {
            DeliveryError::InvalidSubscription(e.to_string())
        }
        e => DeliveryError::Transport(e.to_string()),
    }
}

#[async_trait::async_trait]
impl IPushTransport for WebPushTransport {
    async fn send(
        &self,
        subscription: &SubscriptionInfo,
        payload: &ReminderPayload,
    ) -> Result<(), DeliveryError> {
        let content =
            serde_json::to_vec(payload).map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let message = {
            let info = ::web_push::SubscriptionInfo::new(
                &subscription.endpoint,
                &subscription.keys.p256dh,
                &subscription.keys.auth,
            );

            let mut sig_builder =
                VapidSignatureBuilder::from_pem(self.vapid.private_key_pem.as_bytes(), &info)
                    .map_err(to_delivery_error)?;
            sig_builder.add_claim("sub", self.vapid.subject.as_str());
            let signature = sig_builder.build().map_err(to_delivery_error)?;

            let mut builder = WebPushMessageBuilder::new(&info);
            builder.set_ttl(self.ttl);
            builder.set_payload(ContentEncoding::Aes128Gcm, &content);
            builder.set_vapid_signature(signature);
            builder.build().map_err(to_delivery_error)?
        };

        self.client.send(message).await.map_err(to_delivery_error)
    }
}
