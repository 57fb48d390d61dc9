use crate::{
    error::RemindrError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use remindr_api_structs::get_push_subscriptions::*;
use remindr_domain::{PushSubscription, ID};
use remindr_infra::RemindrContext;

pub async fn get_push_subscriptions_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    let usecase = GetPushSubscriptionsUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|subscriptions| HttpResponse::Ok().json(APIResponse::new(subscriptions)))
        .map_err(|_| RemindrError::InternalError)
}

#[derive(Debug)]
pub struct GetPushSubscriptionsUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetPushSubscriptionsUseCase {
    type Response = Vec<PushSubscription>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .push_subscriptions
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
