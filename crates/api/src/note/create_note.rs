use super::subscribers::SyncFallbackTimerOnNoteCreated;
use crate::{
    error::RemindrError,
    shared::usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use remindr_api_structs::create_note::*;
use remindr_domain::{InvalidRepeatRule, ReminderNote, RepeatType, ID};
use remindr_infra::RemindrContext;

fn handle_error(e: UseCaseError) -> RemindrError {
    match e {
        UseCaseError::EmptyTitle => {
            RemindrError::BadClientData("The note must have a title.".into())
        }
        UseCaseError::InvalidRepeatRule(e) => {
            RemindrError::BadClientData(format!("Invalid repeat rule: {}", e))
        }
        UseCaseError::StorageError => RemindrError::InternalError,
    }
}

pub async fn create_note_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    let body = body.0;
    let usecase = CreateNoteUseCase {
        user_id: path_params.user_id.clone(),
        title: body.title,
        content: body.content,
        reminder_date: body.reminder_date,
        reminder_time: body.reminder_time,
        repeat_type: body.repeat_type,
        repeat_interval: body.repeat_interval,
    };

    execute(usecase, &ctx)
        .await
        .map(|note| HttpResponse::Created().json(APIResponse::new(note)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct CreateNoteUseCase {
    pub user_id: ID,
    pub title: String,
    pub content: String,
    pub reminder_date: NaiveDate,
    pub reminder_time: NaiveTime,
    pub repeat_type: RepeatType,
    pub repeat_interval: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    EmptyTitle,
    InvalidRepeatRule(InvalidRepeatRule),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateNoteUseCase {
    type Response = ReminderNote;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }

        let mut note = ReminderNote::new(
            self.user_id.clone(),
            self.title.clone(),
            self.content.clone(),
            self.reminder_date,
            self.reminder_time,
            ctx.sys.get_timestamp_millis(),
        );
        note.set_schedule(
            self.reminder_date,
            self.reminder_time,
            self.repeat_type,
            self.repeat_interval,
        )
        .map_err(UseCaseError::InvalidRepeatRule)?;

        ctx.repos
            .notes
            .insert(&note)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(note)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncFallbackTimerOnNoteCreated)]
    }
}
