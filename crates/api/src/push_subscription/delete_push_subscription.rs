use crate::{
    error::RemindrError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use remindr_api_structs::delete_push_subscription::*;
use remindr_domain::{PushSubscription, ID};
use remindr_infra::RemindrContext;

fn handle_error(e: UseCaseError) -> RemindrError {
    match e {
        UseCaseError::NotFound(subscription_id) => RemindrError::NotFound(format!(
            "The push subscription with id: {}, was not found.",
            subscription_id
        )),
    }
}

pub async fn delete_push_subscription_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    let usecase = DeletePushSubscriptionUseCase {
        user_id: path_params.user_id.clone(),
        subscription_id: path_params.subscription_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| HttpResponse::Ok().json(APIResponse::new(subscription)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct DeletePushSubscriptionUseCase {
    pub user_id: ID,
    pub subscription_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeletePushSubscriptionUseCase {
    type Response = PushSubscription;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        let repo = &ctx.repos.push_subscriptions;
        match repo.find(&self.subscription_id).await {
            Some(subscription) if subscription.user_id == self.user_id => repo
                .delete(&subscription.id)
                .await
                .ok_or_else(|| UseCaseError::NotFound(self.subscription_id.clone())),
            _ => Err(UseCaseError::NotFound(self.subscription_id.clone())),
        }
    }
}
