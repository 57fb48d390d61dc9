mod date;
mod note;
mod push_subscription;
mod repeat;
mod shared;

pub use date::{
    format_reminder_date, format_reminder_time, parse_reminder_date, parse_reminder_time,
    reminder_date_format, reminder_instant, reminder_time_format, split_instant,
};
pub use note::{NoteTransition, ReminderNote};
pub use push_subscription::{
    InvalidSubscriptionError, PushSubscription, ReminderPayload, SubscriptionInfo,
    SubscriptionKeys,
};
pub use repeat::{next_occurrence, InvalidRepeatRule, RepeatRule, RepeatType};
pub use shared::entity::{Entity, InvalidIDError, ID};
