mod note;
mod push_subscription;
mod shared;

pub use note::{INoteRepo, InMemoryNoteRepo, NoteClaim, PostgresNoteRepo};
pub use push_subscription::{
    IPushSubscriptionRepo, InMemoryPushSubscriptionRepo, PostgresPushSubscriptionRepo,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub notes: Arc<dyn INoteRepo>,
    pub push_subscriptions: Arc<dyn IPushSubscriptionRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB RUNNING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB RUNNING MIGRATIONS ... [done]");

        Ok(Self {
            notes: Arc::new(PostgresNoteRepo::new(pool.clone())),
            push_subscriptions: Arc::new(PostgresPushSubscriptionRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            notes: Arc::new(InMemoryNoteRepo::new()),
            push_subscriptions: Arc::new(InMemoryPushSubscriptionRepo::new()),
        }
    }
}
