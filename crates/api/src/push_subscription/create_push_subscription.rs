use crate::{
    error::RemindrError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use remindr_api_structs::create_push_subscription::*;
use remindr_domain::{InvalidSubscriptionError, PushSubscription, SubscriptionInfo, ID};
use remindr_infra::RemindrContext;

fn handle_error(e: UseCaseError) -> RemindrError {
    match e {
        UseCaseError::InvalidSubscription(e) => {
            RemindrError::BadClientData(format!("Invalid push subscription: {}", e))
        }
        UseCaseError::StorageError => RemindrError::InternalError,
    }
}

pub async fn create_push_subscription_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    let usecase = CreatePushSubscriptionUseCase {
        user_id: path_params.user_id.clone(),
        subscription: body.0.subscription,
    };

    execute(usecase, &ctx)
        .await
        .map(|push_subscription| {
            HttpResponse::Created().json(APIResponse::new(push_subscription))
        })
        .map_err(handle_error)
}

/// Registers a browser push endpoint for the user. Registering a known
/// endpoint again refreshes its keys.
#[derive(Debug)]
pub struct CreatePushSubscriptionUseCase {
    pub user_id: ID,
    pub subscription: SubscriptionInfo,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidSubscription(InvalidSubscriptionError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreatePushSubscriptionUseCase {
    type Response = PushSubscription;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        self.subscription
            .validate()
            .map_err(UseCaseError::InvalidSubscription)?;

        let push_subscription =
            PushSubscription::new(self.user_id.clone(), self.subscription.clone());
        ctx.repos
            .push_subscriptions
            .upsert(&push_subscription)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
