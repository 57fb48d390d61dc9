use crate::{
    note::ReminderNote,
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Encryption keys of a browser push subscription, base64url encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// The shape produced by `PushSubscription.toJSON()` in the browser.
/// It is treated as an opaque delivery token apart from validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidSubscriptionError {
    #[error("Push endpoint is not a valid http(s) url: {0}")]
    Endpoint(String),
    #[error("Push subscription is missing the {0} key")]
    MissingKey(&'static str),
}

impl SubscriptionInfo {
    pub fn validate(&self) -> Result<(), InvalidSubscriptionError> {
        match Url::parse(&self.endpoint) {
            Ok(url) if url.scheme() == "https" || url.scheme() == "http" => {}
            _ => return Err(InvalidSubscriptionError::Endpoint(self.endpoint.clone())),
        }
        if self.keys.p256dh.trim().is_empty() {
            return Err(InvalidSubscriptionError::MissingKey("p256dh"));
        }
        if self.keys.auth.trim().is_empty() {
            return Err(InvalidSubscriptionError::MissingKey("auth"));
        }
        Ok(())
    }
}

/// A registered delivery endpoint (device / browser) of a user
#[derive(Debug, Clone, PartialEq)]
pub struct PushSubscription {
    pub id: ID,
    pub user_id: ID,
    pub subscription: SubscriptionInfo,
}

impl PushSubscription {
    pub fn new(user_id: ID, subscription: SubscriptionInfo) -> Self {
        Self {
            id: Default::default(),
            user_id,
            subscription,
        }
    }
}

impl Entity for PushSubscription {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// The json body that is pushed to every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPayload {
    pub title: String,
    pub body: String,
}

impl ReminderPayload {
    pub fn for_note(note: &ReminderNote) -> Self {
        Self {
            title: format!("🔔 {}", note.title),
            body: note.content.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn info(endpoint: &str) -> SubscriptionInfo {
        SubscriptionInfo {
            endpoint: endpoint.into(),
            keys: SubscriptionKeys {
                p256dh: "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM".into(),
                auth: "tBHItJI5svbpez7KI4CCXg".into(),
            },
        }
    }

    #[test]
    fn accepts_browser_subscriptions() {
        assert!(info("https://fcm.googleapis.com/fcm/send/abc:123")
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_malformed_subscriptions() {
        assert!(info("not a url").validate().is_err());
        assert!(info("ftp://push.example.com/1").validate().is_err());

        let mut missing_auth = info("https://push.example.com/1");
        missing_auth.keys.auth = "".into();
        assert_eq!(
            missing_auth.validate(),
            Err(InvalidSubscriptionError::MissingKey("auth"))
        );
    }

    #[test]
    fn deserializes_browser_json() {
        let json = r#"{"endpoint":"https://push.example.com/x","expirationTime":null,"keys":{"p256dh":"abc","auth":"def"}}"#;
        let info: SubscriptionInfo = serde_json::from_str(json).expect("Valid subscription json");
        assert_eq!(info.keys.auth, "def");
    }
}
