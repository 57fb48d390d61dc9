use crate::{APIResponse, BaseClient, ID};
use remindr_api_structs::*;
use remindr_domain::SubscriptionInfo;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct PushSubscriptionClient {
    base: Arc<BaseClient>,
}

pub struct CreatePushSubscriptionInput {
    pub user_id: ID,
    pub subscription: SubscriptionInfo,
}

pub struct DeletePushSubscriptionInput {
    pub user_id: ID,
    pub subscription_id: ID,
}

impl PushSubscriptionClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreatePushSubscriptionInput,
    ) -> APIResponse<create_push_subscription::APIResponse> {
        let body = create_push_subscription::RequestBody {
            subscription: input.subscription,
        };
        self.base
            .post(
                body,
                format!("user/{}/push-subscriptions", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get_by_user(
        &self,
        user_id: ID,
    ) -> APIResponse<get_push_subscriptions::APIResponse> {
        self.base
            .get(
                format!("user/{}/push-subscriptions", user_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(
        &self,
        input: DeletePushSubscriptionInput,
    ) -> APIResponse<delete_push_subscription::APIResponse> {
        self.base
            .delete(
                format!(
                    "user/{}/push-subscriptions/{}",
                    input.user_id, input.subscription_id
                ),
                StatusCode::OK,
            )
            .await
    }
}
