use crate::dtos::PushSubscriptionDTO;
use remindr_domain::{PushSubscription, SubscriptionInfo, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionResponse {
    pub push_subscription: PushSubscriptionDTO,
}

impl PushSubscriptionResponse {
    pub fn new(push_subscription: PushSubscription) -> Self {
        Self {
            push_subscription: PushSubscriptionDTO::new(push_subscription),
        }
    }
}

pub mod create_push_subscription {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    /// Mirrors the `PushSubscription` object handed out by the browser
    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub subscription: SubscriptionInfo,
    }

    pub type APIResponse = PushSubscriptionResponse;
}

pub mod get_push_subscriptions {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub push_subscriptions: Vec<PushSubscriptionDTO>,
    }

    impl APIResponse {
        pub fn new(push_subscriptions: Vec<PushSubscription>) -> Self {
            Self {
                push_subscriptions: push_subscriptions
                    .into_iter()
                    .map(PushSubscriptionDTO::new)
                    .collect(),
            }
        }
    }
}

pub mod delete_push_subscription {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub subscription_id: ID,
    }

    pub type APIResponse = PushSubscriptionResponse;
}
