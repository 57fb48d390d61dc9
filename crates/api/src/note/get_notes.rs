use crate::{
    error::RemindrError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use remindr_api_structs::get_notes::*;
use remindr_domain::{ReminderNote, ID};
use remindr_infra::RemindrContext;

pub async fn get_notes_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    let usecase = GetNotesUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|notes| HttpResponse::Ok().json(APIResponse::new(notes)))
        .map_err(|_| RemindrError::InternalError)
}

#[derive(Debug)]
pub struct GetNotesUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetNotesUseCase {
    type Response = Vec<ReminderNote>;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .notes
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
