use super::IPushSubscriptionRepo;
use remindr_domain::{PushSubscription, SubscriptionInfo, SubscriptionKeys, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresPushSubscriptionRepo {
    pool: PgPool,
}

impl PostgresPushSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PushSubscriptionRaw {
    push_subscription_uid: Uuid,
    user_uid: Uuid,
    endpoint: String,
    p256dh: String,
    auth: String,
}

impl From<PushSubscriptionRaw> for PushSubscription {
    fn from(raw: PushSubscriptionRaw) -> Self {
        Self {
            id: raw.push_subscription_uid.into(),
            user_id: raw.user_uid.into(),
            subscription: SubscriptionInfo {
                endpoint: raw.endpoint,
                keys: SubscriptionKeys {
                    p256dh: raw.p256dh,
                    auth: raw.auth,
                },
            },
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for PostgresPushSubscriptionRepo {
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<PushSubscription> {
        let raw = sqlx::query_as::<_, PushSubscriptionRaw>(
            r#"
            INSERT INTO push_subscriptions
            (push_subscription_uid, user_uid, endpoint, p256dh, auth)
            VALUES($1, $2, $3, $4, $5)
            ON CONFLICT (user_uid, endpoint) DO UPDATE
            SET p256dh = EXCLUDED.p256dh,
                auth = EXCLUDED.auth
            RETURNING *
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(subscription.user_id.inner_ref())
        .bind(&subscription.subscription.endpoint)
        .bind(&subscription.subscription.keys.p256dh)
        .bind(&subscription.subscription.keys.auth)
        .fetch_one(&self.pool)
        .await?;
        Ok(raw.into())
    }

    async fn find(&self, subscription_id: &ID) -> Option<PushSubscription> {
        sqlx::query_as::<_, PushSubscriptionRaw>(
            r#"
            SELECT * FROM push_subscriptions AS s
            WHERE s.push_subscription_uid = $1
            "#,
        )
        .bind(subscription_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()?
        .map(|raw| raw.into())
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<PushSubscription>> {
        let rows = sqlx::query_as::<_, PushSubscriptionRaw>(
            r#"
            SELECT * FROM push_subscriptions AS s
            WHERE s.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|raw| raw.into()).collect())
    }

    async fn delete(&self, subscription_id: &ID) -> Option<PushSubscription> {
        sqlx::query_as::<_, PushSubscriptionRaw>(
            r#"
            DELETE FROM push_subscriptions AS s
            WHERE s.push_subscription_uid = $1
            RETURNING *
            "#,
        )
        .bind(subscription_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()?
        .map(|raw| raw.into())
    }
}
