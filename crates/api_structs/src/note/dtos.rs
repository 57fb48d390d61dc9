use chrono::{NaiveDate, NaiveTime};
use remindr_domain::{reminder_date_format, reminder_time_format, ReminderNote, RepeatType, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderNoteDTO {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    pub content: String,
    #[serde(with = "reminder_date_format")]
    pub reminder_date: NaiveDate,
    #[serde(with = "reminder_time_format")]
    pub reminder_time: NaiveTime,
    pub repeat_type: RepeatType,
    pub repeat_interval: i64,
    pub notification_sent: bool,
    pub created: i64,
    pub updated: i64,
}

impl ReminderNoteDTO {
    pub fn new(note: ReminderNote) -> Self {
        Self {
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            reminder_date: note.reminder_date,
            reminder_time: note.reminder_time,
            repeat_type: note.repeat_type,
            repeat_interval: note.repeat_interval,
            notification_sent: note.notification_sent,
            created: note.created,
            updated: note.updated,
        }
    }
}
