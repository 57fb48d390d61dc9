use crate::{APIResponse, BaseClient};
use remindr_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Runs one dispatch cycle on the server
    pub async fn dispatch(&self) -> APIResponse<dispatch_reminders::APIResponse> {
        self.base
            .post((), "reminders/dispatch".into(), StatusCode::OK)
            .await
    }
}
