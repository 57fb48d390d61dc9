mod config;
mod repos;
mod services;
mod system;
mod timers;

pub use config::{Config, VapidConfig};
pub use repos::{
    INoteRepo, IPushSubscriptionRepo, InMemoryNoteRepo, InMemoryPushSubscriptionRepo, NoteClaim,
    Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys};
pub use timers::FallbackTimers;
use tracing::warn;

#[derive(Clone)]
pub struct RemindrContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub push: Arc<dyn IPushTransport>,
    pub timers: Arc<FallbackTimers>,
}

impl RemindrContext {
    /// Connects to the configured infrastructure. Falls back to in-memory
    /// repositories and push transport when neither is configured.
    ///
    /// Fails when a database is configured without push credentials, as the
    /// dispatch cycle would otherwise mark stored notes delivered without
    /// sending anything.
    pub async fn create(config: Config) -> anyhow::Result<Self> {
        let push: Arc<dyn IPushTransport> = match (&config.vapid, &config.database_url) {
            (Some(vapid), _) => Arc::new(WebPushTransport::new(vapid.clone(), config.push_ttl)?),
            (None, Some(_)) => anyhow::bail!(
                "VAPID_PRIVATE_KEY must be set when DATABASE_URL is set, push notifications cannot be delivered without it"
            ),
            (None, None) => {
                warn!("Push notifications are only recorded in memory.");
                Arc::new(InMemoryPushTransport::new())
            }
        };
        let repos = match &config.database_url {
            Some(connection_string) => Repos::create_postgres(connection_string).await?,
            None => {
                warn!("Running with in-memory repositories, nothing will be persisted.");
                Repos::create_inmemory()
            }
        };

        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            push,
            timers: Arc::new(FallbackTimers::new()),
        })
    }

    /// A context without any external dependencies
    pub fn create_inmemory(config: Config) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config,
            sys: Arc::new(RealSys {}),
            push: Arc::new(InMemoryPushTransport::new()),
            timers: Arc::new(FallbackTimers::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<RemindrContext> {
    RemindrContext::create(Config::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn database_without_push_credentials_is_rejected() {
        let mut config = Config::default();
        config.database_url = Some("postgres://remindr@localhost:5432/remindr".into());
        config.vapid = None;

        let err = RemindrContext::create(config).await.err().unwrap();
        assert!(err.to_string().contains("VAPID_PRIVATE_KEY"));
    }

    #[tokio::test]
    async fn fully_in_memory_context_records_pushes() {
        let mut config = Config::default();
        config.database_url = None;
        config.vapid = None;

        assert!(RemindrContext::create(config).await.is_ok());
    }
}
