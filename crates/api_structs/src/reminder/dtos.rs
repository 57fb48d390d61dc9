use remindr_domain::ID;
use serde::{Deserialize, Serialize};

/// Outcome counters of one dispatch cycle
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReportDTO {
    pub cycle_id: ID,
    pub selected: usize,
    pub sent: usize,
    pub rescheduled: usize,
    pub retry_pending: usize,
    pub skipped: usize,
    pub failed: usize,
    pub deliveries_succeeded: usize,
    pub deliveries_failed: usize,
}
