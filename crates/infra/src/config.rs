use std::{str::FromStr, time::Duration};
use tracing::{info, warn};

/// Signing material for the web push VAPID protocol
#[derive(Debug, Clone)]
pub struct VapidConfig {
    /// PEM encoded EC (P-256) private key
    pub private_key_pem: String,
    /// Contact claim sent to the push services, e.g. `mailto:ops@example.com`
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Postgres connection string. In-memory repositories are used when it is missing.
    pub database_url: Option<String>,
    /// Credentials for delivering web push notifications. Required together with
    /// `database_url`, deliveries are only recorded in memory without both.
    pub vapid: Option<VapidConfig>,
    /// How often the in-process job scheduler runs a dispatch cycle.
    /// A zero duration disables the job scheduler.
    pub dispatch_interval: Duration,
    /// Maximum number of due notes handled by one dispatch cycle
    pub dispatch_batch_size: usize,
    /// Upper bound for a single delivery attempt to one endpoint
    pub delivery_timeout: Duration,
    /// For how long a dispatch cycle owns a note it is delivering
    pub claim_lease: Duration,
    /// Fallback timers are only scheduled for reminders at most this far ahead
    pub fallback_timer_horizon: Duration,
    /// How long push services should keep an undelivered notification, in seconds
    pub push_ttl: u32,
}

fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_secs_env_or(name: &str, default_secs: u64) -> Duration {
    Duration::from_secs(parse_env_or(name, default_secs))
}

impl Config {
    pub fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL").ok();
        if database_url.is_none() {
            info!("Did not find DATABASE_URL environment variable. Going to use in-memory repositories.");
        }

        let vapid = match std::env::var("VAPID_PRIVATE_KEY") {
            Ok(private_key_pem) => Some(VapidConfig {
                private_key_pem,
                subject: std::env::var("VAPID_SUBJECT")
                    .unwrap_or_else(|_| "mailto:admin@localhost".into()),
            }),
            Err(_) => {
                warn!("Did not find VAPID_PRIVATE_KEY environment variable. Push notifications can only be recorded in memory.");
                None
            }
        };

        let dispatch_batch_size = match parse_env_or("DISPATCH_BATCH_SIZE", 500usize) {
            0 => {
                warn!("DISPATCH_BATCH_SIZE must be positive, falling back to the default value: 500.");
                500
            }
            size => size,
        };

        Self {
            port: parse_env_or("PORT", 5000),
            database_url,
            vapid,
            dispatch_interval: parse_secs_env_or("DISPATCH_INTERVAL_SECS", 60),
            dispatch_batch_size,
            delivery_timeout: parse_secs_env_or("DELIVERY_TIMEOUT_SECS", 10),
            claim_lease: parse_secs_env_or("CLAIM_LEASE_SECS", 5 * 60),
            fallback_timer_horizon: parse_secs_env_or("FALLBACK_TIMER_HORIZON_SECS", 60 * 60),
            push_ttl: parse_env_or("PUSH_TTL_SECS", 60 * 60 * 24),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_values_and_falls_back_on_garbage() {
        std::env::set_var("REMINDR_TEST_PARSE_OK", "42");
        std::env::set_var("REMINDR_TEST_PARSE_BAD", "forty-two");
        assert_eq!(parse_env_or("REMINDR_TEST_PARSE_OK", 7usize), 42);
        assert_eq!(parse_env_or("REMINDR_TEST_PARSE_BAD", 7usize), 7);
        assert_eq!(parse_env_or("REMINDR_TEST_PARSE_MISSING", 7usize), 7);
        assert_eq!(
            parse_secs_env_or("REMINDR_TEST_PARSE_OK", 1),
            Duration::from_secs(42)
        );
    }
}
