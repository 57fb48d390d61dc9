use crate::dtos::DispatchReportDTO;
use serde::{Deserialize, Serialize};

pub mod dispatch_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub report: DispatchReportDTO,
    }

    impl APIResponse {
        pub fn new(report: DispatchReportDTO) -> Self {
            Self { report }
        }
    }
}
