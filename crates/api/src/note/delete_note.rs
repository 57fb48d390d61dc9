use super::subscribers::CancelFallbackTimerOnNoteDeleted;
use crate::{
    error::RemindrError,
    shared::usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpResponse};
use remindr_api_structs::delete_note::*;
use remindr_domain::{ReminderNote, ID};
use remindr_infra::RemindrContext;

fn handle_error(e: UseCaseError) -> RemindrError {
    match e {
        UseCaseError::NotFound(note_id) => RemindrError::NotFound(format!(
            "The reminder note with id: {}, was not found.",
            note_id
        )),
        UseCaseError::StorageError => RemindrError::InternalError,
    }
}

pub async fn delete_note_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    let usecase = DeleteNoteUseCase {
        user_id: path_params.user_id.clone(),
        note_id: path_params.note_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|note| HttpResponse::Ok().json(APIResponse::new(note)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct DeleteNoteUseCase {
    pub user_id: ID,
    pub note_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteNoteUseCase {
    type Response = ReminderNote;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        let note = match ctx.repos.notes.find(&self.note_id).await {
            Ok(Some(note)) if note.user_id == self.user_id => note,
            Ok(_) => return Err(UseCaseError::NotFound(self.note_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        ctx.repos
            .notes
            .delete(&note.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or_else(|| UseCaseError::NotFound(self.note_id.clone()))
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CancelFallbackTimerOnNoteDeleted)]
    }
}
