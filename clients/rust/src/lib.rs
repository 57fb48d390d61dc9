mod base;
mod note;
mod push_subscription;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use note::NoteClient;
pub use note::{CreateNoteInput, DeleteNoteInput, GetNoteInput, UpdateNoteInput};
use push_subscription::PushSubscriptionClient;
pub use push_subscription::{CreatePushSubscriptionInput, DeletePushSubscriptionInput};
pub use remindr_api_structs::dtos::*;
pub use remindr_domain::{RepeatType, SubscriptionInfo, SubscriptionKeys, ID};
use reminder::ReminderClient;
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use remindr_api_structs::dtos::DispatchReportDTO as DispatchReport;
pub use remindr_api_structs::dtos::PushSubscriptionDTO as PushSubscription;
pub use remindr_api_structs::dtos::ReminderNoteDTO as ReminderNote;

/// Remindr Server SDK
///
/// The SDK contains methods for interacting with the Remindr server
/// API.
#[derive(Clone)]
pub struct RemindrSDK {
    pub note: NoteClient,
    pub push_subscription: PushSubscriptionClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl RemindrSDK {
    pub fn new<T: Into<String>>(address: T) -> Self {
        let base = Arc::new(BaseClient::new(address.into()));
        let note = NoteClient::new(base.clone());
        let push_subscription = PushSubscriptionClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            note,
            push_subscription,
            reminder,
            status,
        }
    }
}
