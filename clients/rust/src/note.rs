use crate::{APIResponse, BaseClient, RepeatType, ID};
use chrono::{NaiveDate, NaiveTime};
use remindr_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct NoteClient {
    base: Arc<BaseClient>,
}

pub struct CreateNoteInput {
    pub user_id: ID,
    pub title: String,
    pub content: String,
    pub reminder_date: NaiveDate,
    pub reminder_time: NaiveTime,
    pub repeat_type: RepeatType,
    pub repeat_interval: i64,
}

pub struct GetNoteInput {
    pub user_id: ID,
    pub note_id: ID,
}

pub type DeleteNoteInput = GetNoteInput;

#[derive(Default)]
pub struct UpdateNoteInput {
    pub user_id: ID,
    pub note_id: ID,
    pub title: Option<String>,
    pub content: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_time: Option<NaiveTime>,
    pub repeat_type: Option<RepeatType>,
    pub repeat_interval: Option<i64>,
}

impl NoteClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateNoteInput) -> APIResponse<create_note::APIResponse> {
        let body = create_note::RequestBody {
            title: input.title,
            content: input.content,
            reminder_date: input.reminder_date,
            reminder_time: input.reminder_time,
            repeat_type: input.repeat_type,
            repeat_interval: input.repeat_interval,
        };
        self.base
            .post(
                body,
                format!("user/{}/notes", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get(&self, input: GetNoteInput) -> APIResponse<get_note::APIResponse> {
        self.base
            .get(
                format!("user/{}/notes/{}", input.user_id, input.note_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_by_user(&self, user_id: ID) -> APIResponse<get_notes::APIResponse> {
        self.base
            .get(format!("user/{}/notes", user_id), StatusCode::OK)
            .await
    }

    pub async fn update(&self, input: UpdateNoteInput) -> APIResponse<update_note::APIResponse> {
        let body = update_note::RequestBody {
            title: input.title,
            content: input.content,
            reminder_date: input.reminder_date,
            reminder_time: input.reminder_time,
            repeat_type: input.repeat_type,
            repeat_interval: input.repeat_interval,
        };
        self.base
            .put(
                body,
                format!("user/{}/notes/{}", input.user_id, input.note_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, input: DeleteNoteInput) -> APIResponse<delete_note::APIResponse> {
        self.base
            .delete(
                format!("user/{}/notes/{}", input.user_id, input.note_id),
                StatusCode::OK,
            )
            .await
    }
}
