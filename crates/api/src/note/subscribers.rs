use super::{
    create_note::CreateNoteUseCase, delete_note::DeleteNoteUseCase,
    update_note::UpdateNoteUseCase,
};
use crate::{
    reminder::{cancel_fallback_timer, sync_fallback_timer},
    shared::usecase::Subscriber,
};
use remindr_domain::ReminderNote;
use remindr_infra::RemindrContext;

pub struct SyncFallbackTimerOnNoteCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateNoteUseCase> for SyncFallbackTimerOnNoteCreated {
    async fn notify(&self, e: &ReminderNote, ctx: &RemindrContext) {
        sync_fallback_timer(e, ctx);
    }
}

pub struct SyncFallbackTimerOnNoteUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateNoteUseCase> for SyncFallbackTimerOnNoteUpdated {
    async fn notify(&self, e: &ReminderNote, ctx: &RemindrContext) {
        sync_fallback_timer(e, ctx);
    }
}

pub struct CancelFallbackTimerOnNoteDeleted;

#[async_trait::async_trait(?Send)]
impl Subscriber<DeleteNoteUseCase> for CancelFallbackTimerOnNoteDeleted {
    async fn notify(&self, e: &ReminderNote, ctx: &RemindrContext) {
        cancel_fallback_timer(&e.id, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::Duration;
    use remindr_domain::{split_instant, RepeatType, ID};
    use remindr_infra::Config;

    #[actix_web::main]
    #[test]
    async fn note_lifecycle_maintains_fallback_timer() {
        let ctx = RemindrContext::create_inmemory(Config::default());
        let (date, time) = split_instant(&(ctx.sys.now() + Duration::minutes(30)));
        let user_id = ID::new();

        let note = execute(
            CreateNoteUseCase {
                user_id: user_id.clone(),
                title: "Take the cake out".into(),
                content: "".into(),
                reminder_date: date,
                reminder_time: time,
                repeat_type: RepeatType::None,
                repeat_interval: 1,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(ctx.timers.is_scheduled(&note.id));

        let (later_date, later_time) = split_instant(&(ctx.sys.now() + Duration::days(3)));
        execute(
            UpdateNoteUseCase {
                user_id: user_id.clone(),
                note_id: note.id.clone(),
                reminder_date: Some(later_date),
                reminder_time: Some(later_time),
                ..Default::default()
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(!ctx.timers.is_scheduled(&note.id));

        execute(
            UpdateNoteUseCase {
                user_id: user_id.clone(),
                note_id: note.id.clone(),
                reminder_date: Some(date),
                reminder_time: Some(time),
                ..Default::default()
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(ctx.timers.is_scheduled(&note.id));

        execute(
            DeleteNoteUseCase {
                user_id,
                note_id: note.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(ctx.timers.is_empty());
    }
}
