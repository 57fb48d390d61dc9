//! Runs a single dispatch cycle against the configured database and exits.
//!
//! Meant to be triggered by an external scheduler such as cron. Exits with
//! status 1 when the database or the push credentials are not configured, when
//! the database cannot be reached or when the due notes cannot be selected.

use remindr::telemetry::{get_subscriber, init_subscriber};
use remindr_api::{execute, DispatchRemindersUseCase};
use remindr_infra::{Config, RemindrContext};
use std::process::ExitCode;
use tracing::error;

#[actix_web::main]
async fn main() -> ExitCode {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("remindr_dispatch".into(), "info".into());
    init_subscriber(subscriber);

    let config = Config::new();
    if config.database_url.is_none() {
        error!("DATABASE_URL must be set to dispatch reminders.");
        return ExitCode::FAILURE;
    }
    if config.vapid.is_none() {
        error!("VAPID_PRIVATE_KEY must be set to dispatch reminders.");
        return ExitCode::FAILURE;
    }

    let context = match RemindrContext::create(config).await {
        Ok(context) => context,
        Err(e) => {
            error!("Unable to set up the dispatch context: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    match execute(DispatchRemindersUseCase, &context).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Dispatch cycle aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
