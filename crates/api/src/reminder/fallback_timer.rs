use super::deliver::deliver;
use remindr_domain::{ReminderNote, ID};
use remindr_infra::RemindrContext;
use tracing::{debug, error};

/// Keeps the in-process timer of a note in line with its schedule.
///
/// A timer is only kept for a pending note whose reminder lies in the future and
/// within `Config::fallback_timer_horizon`. Firing only delivers, the persisted
/// state of the note is left to the dispatch cycle.
pub fn sync_fallback_timer(note: &ReminderNote, ctx: &RemindrContext) {
    if note.notification_sent {
        cancel_fallback_timer(&note.id, ctx);
        return;
    }

    let delay = match (note.reminder_at() - ctx.sys.now()).to_std() {
        Ok(delay) if !delay.is_zero() && delay <= ctx.config.fallback_timer_horizon => delay,
        _ => {
            cancel_fallback_timer(&note.id, ctx);
            return;
        }
    };

    debug!(
        "Scheduling fallback timer for reminder note {} in {:?}",
        note.id, delay
    );
    let task_ctx = ctx.clone();
    let note = note.clone();
    ctx.timers
        .schedule(note.id.clone(), delay, fire_fallback_timer(note, task_ctx));
}

pub fn cancel_fallback_timer(note_id: &ID, ctx: &RemindrContext) {
    if ctx.timers.cancel(note_id) {
        debug!("Cancelled fallback timer for reminder note {}", note_id);
    }
}

async fn fire_fallback_timer(note: ReminderNote, ctx: RemindrContext) {
    match ctx.repos.push_subscriptions.find_by_user(&note.user_id).await {
        Ok(endpoints) => {
            deliver(&note, &endpoints, &ctx).await;
        }
        Err(e) => error!(
            "Fallback timer for reminder note {} could not fetch push subscriptions: {}",
            note.id, e
        ),
    }
}
