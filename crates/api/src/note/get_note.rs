use crate::{
    error::RemindrError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use remindr_api_structs::get_note::*;
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

pub async fn get_note_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    let usecase = GetNoteUseCase {
        user_id: path_params.user_id.clone(),
        note_id: path_params.note_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|note| HttpResponse::Ok().json(APIResponse::new(note)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetNoteUseCase {
    pub user_id: ID,
    pub note_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetNoteUseCase {
    type Response = ReminderNote;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        let note = ctx
            .repos
            .notes
            .find(&self.note_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        match note {
            Some(note) if note.user_id == self.user_id => Ok(note),
            _ => Err(UseCaseError::NotFound(self.note_id.clone())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
    use remindr_domain::NoteTransition;
    use remindr_infra::{Config, INoteRepo, NoteClaim};
    use std::sync::Arc;

    struct UnreachableNoteRepo;

    #[async_trait::async_trait]
    impl INoteRepo for UnreachableNoteRepo {
        async fn insert(&self, _: &ReminderNote) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
        async fn save(&self, _: &ReminderNote) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
        async fn update_content(&self, _: &ReminderNote) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
        async fn find(&self, _: &ID) -> anyhow::Result<Option<ReminderNote>> {
            anyhow::bail!("connection refused")
        }
        async fn find_by_user(&self, _: &ID) -> anyhow::Result<Vec<ReminderNote>> {
            anyhow::bail!("connection refused")
        }
        async fn delete(&self, _: &ID) -> anyhow::Result<Option<ReminderNote>> {
            anyhow::bail!("connection refused")
        }
        async fn find_due(&self, _: DateTime<Utc>, _: usize) -> anyhow::Result<Vec<ReminderNote>> {
            anyhow::bail!("connection refused")
        }
        async fn claim(&self, _: &ID, _: &NoteClaim) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused")
        }
        async fn release(&self, _: &ID, _: &ID) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
        async fn finalize(&self, _: &ID, _: &ID, _: &NoteTransition) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused")
        }
    }

    #[actix_web::main]
    #[test]
    async fn storage_failure_is_not_reported_as_missing_note() {
        let mut ctx = RemindrContext::create_inmemory(Config::default());
        ctx.repos.notes = Arc::new(UnreachableNoteRepo);

        let usecase = GetNoteUseCase {
            user_id: ID::new(),
            note_id: ID::new(),
        };
        let res = execute(usecase, &ctx).await;

        assert!(matches!(res, Err(UseCaseError::StorageError)));
        assert!(matches!(
            handle_error(UseCaseError::StorageError),
            RemindrError::InternalError
        ));
    }

    #[actix_web::main]
    #[test]
    async fn notes_of_other_users_are_not_found() {
        let ctx = RemindrContext::create_inmemory(Config::default());
        let note = ReminderNote::new(
            ID::new(),
            "Dentist".into(),
            String::new(),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            0,
        );
        ctx.repos.notes.insert(&note).await.unwrap();

        let usecase = GetNoteUseCase {
            user_id: ID::new(),
            note_id: note.id.clone(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }
}
