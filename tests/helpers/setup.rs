use remindr_api::Application;
use remindr_infra::{Config, InMemoryPushTransport, RemindrContext};
use remindr_sdk::RemindrSDK;
use std::{sync::Arc, time::Duration};

pub struct TestApp {
    pub config: Config,
    /// Every push notification the application sent
    pub push: Arc<InMemoryPushTransport>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, RemindrSDK, String) {
    let mut config = Config::default();
    config.port = 0; // Random port
    config.dispatch_interval = Duration::ZERO; // Cycles are triggered by the tests

    let mut ctx = RemindrContext::create_inmemory(config);
    let push = Arc::new(InMemoryPushTransport::new());
    ctx.push = push.clone();

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config, push };
    let sdk = RemindrSDK::new(address.clone());
    (app, sdk, address)
}
