use super::IPushSubscriptionRepo;
use crate::repos::shared::inmemory_repo::*;
use remindr_domain::{PushSubscription, ID};
use std::sync::Mutex;

pub struct InMemoryPushSubscriptionRepo {
    subscriptions: Mutex<Vec<PushSubscription>>,
}

impl InMemoryPushSubscriptionRepo {
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for InMemoryPushSubscriptionRepo {
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<PushSubscription> {
        let existing = find_by(&self.subscriptions, |s| {
            s.user_id == subscription.user_id
                && s.subscription.endpoint == subscription.subscription.endpoint
        });
        match existing.into_iter().next() {
            Some(mut stored) => {
                stored.subscription.keys = subscription.subscription.keys.clone();
                save(&stored, &self.subscriptions);
                Ok(stored)
            }
            None => {
                insert(subscription, &self.subscriptions);
                Ok(subscription.clone())
            }
        }
    }

    async fn find(&self, subscription_id: &ID) -> Option<PushSubscription> {
        find(subscription_id, &self.subscriptions)
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<PushSubscription>> {
        Ok(find_by(&self.subscriptions, |s| s.user_id == *user_id))
    }

    async fn delete(&self, subscription_id: &ID) -> Option<PushSubscription> {
        delete(subscription_id, &self.subscriptions)
    }
}
