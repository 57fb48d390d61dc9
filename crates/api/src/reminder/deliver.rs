use futures::future::join_all;
use remindr_domain::{PushSubscription, ReminderNote, ReminderPayload, ID};
use remindr_infra::{DeliveryError, RemindrContext};
use tracing::warn;

/// Outcome of one delivery attempt to one endpoint
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    pub subscription_id: ID,
    pub endpoint: String,
    pub outcome: Result<(), DeliveryError>,
}

impl DeliveryResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The push service no longer knows the endpoint
    pub fn is_gone(&self) -> bool {
        matches!(self.outcome, Err(DeliveryError::EndpointGone))
    }
}

/// Pushes the reminder of the note to every given endpoint at the same time.
///
/// Every attempt is bounded by `Config::delivery_timeout`. A failing endpoint
/// never affects the other attempts and nothing is retried.
pub async fn deliver(
    note: &ReminderNote,
    endpoints: &[PushSubscription],
    ctx: &RemindrContext,
) -> Vec<DeliveryResult> {
    let payload = ReminderPayload::for_note(note);
    let timeout = ctx.config.delivery_timeout;

    let attempts = endpoints.iter().map(|endpoint| {
        let payload = &payload;
        async move {
            let outcome =
                match tokio::time::timeout(timeout, ctx.push.send(&endpoint.subscription, payload))
                    .await
                {
                    Ok(res) => res,
                    Err(_) => Err(DeliveryError::Timeout),
                };
            if let Err(e) = &outcome {
                warn!(
                    "Delivery of reminder note {} to endpoint {} failed: {}",
                    note.id, endpoint.subscription.endpoint, e
                );
            }
            DeliveryResult {
                subscription_id: endpoint.id.clone(),
                endpoint: endpoint.subscription.endpoint.clone(),
                outcome,
            }
        }
    });

    join_all(attempts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use remindr_domain::{SubscriptionInfo, SubscriptionKeys};
    use remindr_infra::{Config, InMemoryPushTransport};
    use std::{sync::Arc, time::Duration};

    fn endpoint(user_id: &ID, url: &str) -> PushSubscription {
        PushSubscription::new(
            user_id.clone(),
            SubscriptionInfo {
                endpoint: url.into(),
                keys: SubscriptionKeys {
                    p256dh: "p256dh".into(),
                    auth: "auth".into(),
                },
            },
        )
    }

    fn setup() -> (RemindrContext, Arc<InMemoryPushTransport>) {
        let mut config = Config::default();
        config.delivery_timeout = Duration::from_millis(50);
        let mut ctx = RemindrContext::create_inmemory(config);
        let push = Arc::new(InMemoryPushTransport::new());
        ctx.push = push.clone();
        (ctx, push)
    }

    fn note(user_id: &ID) -> ReminderNote {
        ReminderNote::new(
            user_id.clone(),
            "Water the plants".into(),
            "The ones on the balcony".into(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            0,
        )
    }

    #[actix_web::main]
    #[test]
    async fn failures_do_not_affect_other_endpoints() {
        let (ctx, push) = setup();
        let user_id = ID::new();
        let note = note(&user_id);
        let endpoints = vec![
            endpoint(&user_id, "https://push.example.com/gone"),
            endpoint(&user_id, "https://push.example.com/slow"),
            endpoint(&user_id, "https://push.example.com/ok"),
        ];
        push.fail_endpoint("https://push.example.com/gone", DeliveryError::EndpointGone);
        push.stall_endpoint("https://push.example.com/slow");

        let results = deliver(&note, &endpoints, &ctx).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].outcome, Err(DeliveryError::EndpointGone));
        assert_eq!(results[1].outcome, Err(DeliveryError::Timeout));
        assert!(results[2].is_success());

        let delivered = push.deliveries_to("https://push.example.com/ok");
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].payload.title, "🔔 Water the plants");
        assert_eq!(delivered[0].payload.body, "The ones on the balcony");
    }

    #[actix_web::main]
    #[test]
    async fn nothing_is_attempted_without_endpoints() {
        let (ctx, push) = setup();
        let results = deliver(&note(&ID::new()), &[], &ctx).await;
        assert!(results.is_empty());
        assert!(push.deliveries().is_empty());
    }
}
