use super::{DeliveryError, IPushTransport};
use remindr_domain::{ReminderPayload, SubscriptionInfo};
use std::{collections::HashMap, sync::Mutex};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDelivery {
    pub endpoint: String,
    pub payload: ReminderPayload,
}

#[derive(Debug, Clone)]
enum EndpointBehaviour {
    Fail(DeliveryError),
    Stall,
}

/// Records every delivery instead of sending it. Used in tests and when no
/// VAPID key is configured. Single endpoints can be told to fail or to never
/// answer.
#[derive(Default)]
pub struct InMemoryPushTransport {
    deliveries: Mutex<Vec<RecordedDelivery>>,
    behaviours: Mutex<HashMap<String, EndpointBehaviour>>,
}

impl InMemoryPushTransport {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn fail_endpoint(&self, endpoint: &str, error: DeliveryError) {
        self.behaviours
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), EndpointBehaviour::Fail(error));
    }

    pub fn stall_endpoint(&self, endpoint: &str) {
        self.behaviours
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), EndpointBehaviour::Stall);
    }

    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn deliveries_to(&self, endpoint: &str) -> Vec<RecordedDelivery> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.endpoint == endpoint)
            .collect()
    }
}

#[async_trait::async_trait]
impl IPushTransport for InMemoryPushTransport {
    async fn send(
        &self,
        subscription: &SubscriptionInfo,
        payload: &ReminderPayload,
    ) -> Result<(), DeliveryError> {
        let behaviour = self
            .behaviours
            .lock()
            .unwrap()
            .get(&subscription.endpoint)
            .cloned();
        match behaviour {
            Some(EndpointBehaviour::Fail(e)) => return Err(e),
            Some(EndpointBehaviour::Stall) => futures::future::pending::<()>().await,
            None => {}
        }

        info!(
            "Recorded push notification `{}` for endpoint: {}",
            payload.title, subscription.endpoint
        );
        self.deliveries.lock().unwrap().push(RecordedDelivery {
            endpoint: subscription.endpoint.clone(),
            payload: payload.clone(),
        });
        Ok(())
    }
}
