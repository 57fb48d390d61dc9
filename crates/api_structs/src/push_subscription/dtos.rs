use remindr_domain::{PushSubscription, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionDTO {
    pub id: ID,
    pub user_id: ID,
    pub endpoint: String,
}

impl PushSubscriptionDTO {
    pub fn new(push_subscription: PushSubscription) -> Self {
        Self {
            id: push_subscription.id,
            user_id: push_subscription.user_id,
            endpoint: push_subscription.subscription.endpoint,
        }
    }
}
