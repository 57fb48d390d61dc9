use super::deliver::{deliver, DeliveryResult};
use crate::{
    error::RemindrError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use remindr_api_structs::{dispatch_reminders::*, dtos::DispatchReportDTO};
use remindr_domain::{InvalidRepeatRule, NoteTransition, ReminderNote, ID};
use remindr_infra::{NoteClaim, RemindrContext};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub async fn dispatch_reminders_controller(
    ctx: web::Data<RemindrContext>,
) -> Result<HttpResponse, RemindrError> {
    execute(DispatchRemindersUseCase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::new(report.into())))
        .map_err(|e| match e {
            UseCaseError::SelectionError(_) => RemindrError::InternalError,
        })
}

/// Runs one dispatch cycle: every due note is delivered to all endpoints of
/// its owner and then advanced to its next state.
#[derive(Debug)]
pub struct DispatchRemindersUseCase;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Unable to select the due reminder notes: {0}")]
    SelectionError(anyhow::Error),
}

/// Failure while handling a single note. It never aborts the cycle.
#[derive(Debug, Error)]
pub enum NoteDispatchError {
    #[error("Invalid repeat rule: {0}")]
    InvalidRepeatRule(#[from] InvalidRepeatRule),
    #[error("Unable to fetch push subscriptions: {0}")]
    EndpointFetch(anyhow::Error),
    #[error("Unable to persist note state: {0}")]
    Persistence(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchReport {
    pub cycle_id: ID,
    /// Notes in the due set
    pub selected: usize,
    /// One-shot notes that were delivered and marked as sent
    pub sent: usize,
    /// Repeating notes that were delivered and moved to their next occurrence
    pub rescheduled: usize,
    /// Notes where every delivery failed. They stay pending and are left out of
    /// the due set until the claim lease has passed.
    pub retry_pending: usize,
    /// Notes handled by another cycle
    pub skipped: usize,
    pub failed: usize,
    pub deliveries_succeeded: usize,
    pub deliveries_failed: usize,
}

impl From<DispatchReport> for DispatchReportDTO {
    fn from(r: DispatchReport) -> Self {
        Self {
            cycle_id: r.cycle_id,
            selected: r.selected,
            sent: r.sent,
            rescheduled: r.rescheduled,
            retry_pending: r.retry_pending,
            skipped: r.skipped,
            failed: r.failed,
            deliveries_succeeded: r.deliveries_succeeded,
            deliveries_failed: r.deliveries_failed,
        }
    }
}

#[derive(Debug)]
enum NoteOutcome {
    Sent,
    Rescheduled,
    RetryPending,
    Skipped,
    Failed(NoteDispatchError),
}

#[derive(Debug)]
struct NoteDispatch {
    outcome: NoteOutcome,
    deliveries: Vec<DeliveryResult>,
}

impl NoteDispatch {
    fn without_deliveries(outcome: NoteOutcome) -> Self {
        Self {
            outcome,
            deliveries: vec![],
        }
    }
}

impl DispatchReport {
    fn record(&mut self, dispatch: NoteDispatch) {
        let succeeded = dispatch.deliveries.iter().filter(|d| d.is_success()).count();
        self.deliveries_succeeded += succeeded;
        self.deliveries_failed += dispatch.deliveries.len() - succeeded;
        match dispatch.outcome {
            NoteOutcome::Sent => self.sent += 1,
            NoteOutcome::Rescheduled => self.rescheduled += 1,
            NoteOutcome::RetryPending => self.retry_pending += 1,
            NoteOutcome::Skipped => self.skipped += 1,
            NoteOutcome::Failed(_) => self.failed += 1,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchRemindersUseCase {
    type Response = DispatchReport;

    type Errors = UseCaseError;

    async fn execute(&mut self, ctx: &RemindrContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.now();
        let cycle_id = ID::new();

        let due = ctx
            .repos
            .notes
            .find_due(now, ctx.config.dispatch_batch_size)
            .await
            .map_err(UseCaseError::SelectionError)?;

        let lease_until = chrono::Duration::from_std(ctx.config.claim_lease)
            .ok()
            .and_then(|lease| now.checked_add_signed(lease))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut report = DispatchReport {
            cycle_id: cycle_id.clone(),
            selected: due.len(),
            ..Default::default()
        };

        let dispatches = join_all(
            due.iter()
                .map(|note| dispatch_note(note, now, lease_until, ctx)),
        )
        .await;

        for (note, dispatch) in due.iter().zip(dispatches) {
            if let NoteOutcome::Failed(e) = &dispatch.outcome {
                error!(
                    "Dispatch cycle {} could not handle reminder note {}: {}",
                    cycle_id, note.id, e
                );
            }
            report.record(dispatch);
        }

        info!(
            "Dispatch cycle {} finished: {} selected, {} sent, {} rescheduled, {} retry pending, {} skipped, {} failed, {} deliveries succeeded, {} deliveries failed",
            report.cycle_id,
            report.selected,
            report.sent,
            report.rescheduled,
            report.retry_pending,
            report.skipped,
            report.failed,
            report.deliveries_succeeded,
            report.deliveries_failed
        );

        Ok(report)
    }
}

async fn dispatch_note(
    note: &ReminderNote,
    now: DateTime<Utc>,
    lease_until: DateTime<Utc>,
    ctx: &RemindrContext,
) -> NoteDispatch {
    let transition = match note.transition() {
        Ok(t) => t,
        Err(e) => return NoteDispatch::without_deliveries(NoteOutcome::Failed(e.into())),
    };

    let claim = NoteClaim {
        token: ID::new(),
        now,
        until: lease_until,
    };
    match ctx.repos.notes.claim(&note.id, &claim).await {
        Ok(true) => {}
        Ok(false) => {
            debug!("Reminder note {} is handled by another cycle", note.id);
            return NoteDispatch::without_deliveries(NoteOutcome::Skipped);
        }
        Err(e) => {
            return NoteDispatch::without_deliveries(NoteOutcome::Failed(
                NoteDispatchError::Persistence(e),
            ))
        }
    }

    let endpoints = match ctx.repos.push_subscriptions.find_by_user(&note.user_id).await {
        Ok(endpoints) => endpoints,
        Err(e) => {
            release(note, &claim, ctx).await;
            return NoteDispatch::without_deliveries(NoteOutcome::Failed(
                NoteDispatchError::EndpointFetch(e),
            ));
        }
    };

    let deliveries = deliver(note, &endpoints, ctx).await;
    let delivered = deliveries.iter().any(|d| d.is_success());
    let pruned = prune_gone_endpoints(&deliveries, ctx).await;

    // Owners without live endpoints still move on, otherwise the note would be due forever
    let outcome = if delivered || pruned == endpoints.len() {
        match ctx
            .repos
            .notes
            .finalize(&note.id, &claim.token, &transition)
            .await
        {
            Ok(true) => match transition {
                NoteTransition::MarkSent => NoteOutcome::Sent,
                NoteTransition::Reschedule { .. } => NoteOutcome::Rescheduled,
            },
            Ok(false) => {
                warn!(
                    "Lost the claim on reminder note {} before its state could be written",
                    note.id
                );
                NoteOutcome::Skipped
            }
            Err(e) => NoteOutcome::Failed(NoteDispatchError::Persistence(e)),
        }
    } else {
        // Claim kept until its lease passes, the note stays out of the due set until then
        debug!(
            "Every delivery of reminder note {} failed, retrying after {}",
            note.id, claim.until
        );
        NoteOutcome::RetryPending
    };

    NoteDispatch {
        outcome,
        deliveries,
    }
}

/// Removes the endpoints the push service reported as gone. Returns how many
/// of the given deliveries went to such endpoints.
async fn prune_gone_endpoints(deliveries: &[DeliveryResult], ctx: &RemindrContext) -> usize {
    let gone = deliveries.iter().filter(|d| d.is_gone());
    let mut pruned = 0;
    for delivery in gone {
        pruned += 1;
        match ctx
            .repos
            .push_subscriptions
            .delete(&delivery.subscription_id)
            .await
        {
            Some(_) => info!(
                "Removed push subscription {} for gone endpoint {}",
                delivery.subscription_id, delivery.endpoint
            ),
            None => debug!(
                "Push subscription {} for gone endpoint {} was already removed",
                delivery.subscription_id, delivery.endpoint
            ),
        }
    }
    pruned
}

async fn release(note: &ReminderNote, claim: &NoteClaim, ctx: &RemindrContext) {
    if let Err(e) = ctx.repos.notes.release(&note.id, &claim.token).await {
        // The lease expires on its own
        warn!("Unable to release the claim on reminder note {}: {}", note.id, e);
    }
}
