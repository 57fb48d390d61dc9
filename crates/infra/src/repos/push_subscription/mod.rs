mod inmemory;
mod postgres;

pub use inmemory::InMemoryPushSubscriptionRepo;
pub use postgres::PostgresPushSubscriptionRepo;
use remindr_domain::{PushSubscription, ID};

#[async_trait::async_trait]
pub trait IPushSubscriptionRepo: Send + Sync {
    /// Stores the subscription. If the user already registered the same endpoint
    /// the stored keys are replaced and the existing subscription is returned.
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<PushSubscription>;
    async fn find(&self, subscription_id: &ID) -> Option<PushSubscription>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<PushSubscription>>;
    async fn delete(&self, subscription_id: &ID) -> Option<PushSubscription>;
}
