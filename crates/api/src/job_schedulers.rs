use crate::{reminder::dispatch_reminders::DispatchRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::{interval_at, Instant};
use remindr_infra::RemindrContext;
use std::time::Duration;
use tracing::info;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Runs a dispatch cycle every `Config::dispatch_interval`, starting at the
/// next full minute. Every cycle runs in its own task so a slow cycle does
/// not hold back the next tick.
pub fn start_dispatch_reminders_job(ctx: RemindrContext) {
    let period = ctx.config.dispatch_interval;
    if period.is_zero() {
        info!("Dispatch interval is zero, the reminder dispatch job is disabled.");
        return;
    }

    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        let mut dispatch_interval = interval_at(start, period);
        loop {
            dispatch_interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(async move {
                let _ = execute(DispatchRemindersUseCase, &context).await;
            });
        }
    });
}
