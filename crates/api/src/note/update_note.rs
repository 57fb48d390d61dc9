use super::subscribers::SyncFallbackTimerOnNoteUpdated;
use crate::{
    error::RemindrError,
    shared::usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use remindr_api_structs::update_note::*;
use remindr_domain::{InvalidRepeatRule, ReminderNote, RepeatType, ID};
use remindr_infra::RemindrContext;

fn handle_error(e: UseCaseError) -> RemindrError {
    match e {
        UseCaseError::NotFound(note_id) => RemindrError::NotFound(format!(
            "The reminder note with id: {}, was not found.",
            note_id
        )),
        UseCaseError::EmptyTitle => {
            RemindrError::BadClientData("The note must have a title.".into())
        }
        UseCaseError::InvalidRepeatRule(e) => {
            RemindrError::BadClientData(format!("Invalid repeat rule: {}", e))
        }
        UseCaseError::StorageError => RemindrError::InternalError,
    }
}

pub async fn update_note_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    let body = body.0;
    let usecase = UpdateNoteUseCase {
        user_id: path_params.user_id.clone(),
        note_id: path_params.note_id.clone(),
        title: body.title,
        content: body.content,
        reminder_date: body.reminder_date,
        reminder_time: body.reminder_time,
        repeat_type: body.repeat_type,
        repeat_interval: body.repeat_interval,
    };

    execute(usecase, &ctx)
        .await
        .map(|note| HttpResponse::Ok().json(APIResponse::new(note)))
        .map_err(handle_error)
}

/// Partial update, fields that are `None` keep their stored value
#[derive(Debug, Default)]
pub struct UpdateNoteUseCase {
    pub user_id: ID,
    pub note_id: ID,
    pub title: Option<String>,
    pub content: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_time: Option<NaiveTime>,
    pub repeat_type: Option<RepeatType>,
    pub repeat_interval: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyTitle,
    InvalidRepeatRule(InvalidRepeatRule),
    StorageError,
}

impl UpdateNoteUseCase {
    fn changes_schedule(&self) -> bool {
        self.reminder_date.is_some()
            || self.reminder_time.is_some()
            || self.repeat_type.is_some()
            || self.repeat_interval.is_some()
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateNoteUseCase {
    type Response = ReminderNote;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        let mut note = match ctx.repos.notes.find(&self.note_id).await {
            Ok(Some(note)) if note.user_id == self.user_id => note,
            Ok(_) => return Err(UseCaseError::NotFound(self.note_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        };

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(UseCaseError::EmptyTitle);
            }
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }

        if self.changes_schedule() {
            note.set_schedule(
                self.reminder_date.unwrap_or(note.reminder_date),
                self.reminder_time.unwrap_or(note.reminder_time),
                self.repeat_type.unwrap_or(note.repeat_type),
                self.repeat_interval.unwrap_or(note.repeat_interval),
            )
            .map_err(UseCaseError::InvalidRepeatRule)?;
        }
        note.updated = ctx.sys.get_timestamp_millis();

        if self.changes_schedule() {
            ctx.repos
                .notes
                .save(&note)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            return Ok(note);
        }

        // A dispatch cycle may have advanced the note since it was read
        ctx.repos
            .notes
            .update_content(&note)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        match ctx.repos.notes.find(&note.id).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(UseCaseError::NotFound(self.note_id.clone())),
            Err(_) => Err(UseCaseError::StorageError),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncFallbackTimerOnNoteUpdated)]
    }
}
