use crate::{
    date::reminder_instant,
    repeat::{InvalidRepeatRule, RepeatRule, RepeatType},
    shared::entity::{Entity, ID},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// A calendar note that carries a reminder.
///
/// `reminder_date` and `reminder_time` are wall-clock values in UTC. A note with
/// `RepeatType::None` is delivered once and then marked as sent, a repeating note
/// is moved forward to its next occurrence every time it has been delivered and
/// never becomes sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderNote {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    pub content: String,
    pub reminder_date: NaiveDate,
    pub reminder_time: NaiveTime,
    pub repeat_type: RepeatType,
    pub repeat_interval: i64,
    pub notification_sent: bool,
    pub created: i64,
    pub updated: i64,
}

/// The state change to apply to a due `ReminderNote` once it has been delivered
#[derive(Debug, Clone, PartialEq)]
pub enum NoteTransition {
    /// Terminal, only for notes that do not repeat
    MarkSent,
    /// Move the schedule to the next occurrence and keep the note pending
    Reschedule { date: NaiveDate, time: NaiveTime },
}

impl ReminderNote {
    pub fn new(
        user_id: ID,
        title: String,
        content: String,
        reminder_date: NaiveDate,
        reminder_time: NaiveTime,
        now_millis: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            user_id,
            title,
            content,
            reminder_date,
            reminder_time,
            repeat_type: RepeatType::None,
            repeat_interval: 1,
            notification_sent: false,
            created: now_millis,
            updated: now_millis,
        }
    }

    pub fn reminder_at(&self) -> DateTime<Utc> {
        reminder_instant(self.reminder_date, self.reminder_time)
    }

    pub fn is_due(&self, now: &DateTime<Utc>) -> bool {
        !self.notification_sent && self.reminder_at() <= *now
    }

    /// The validated repeat rule, or `None` for a one-shot reminder
    pub fn repeat_rule(&self) -> Result<Option<RepeatRule>, InvalidRepeatRule> {
        if !self.repeat_type.is_repeating() {
            return Ok(None);
        }
        RepeatRule::new(self.repeat_type, self.repeat_interval).map(Some)
    }

    /// Sets the schedule of the note. Any schedule change makes the note pending again.
    pub fn set_schedule(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        repeat_type: RepeatType,
        repeat_interval: i64,
    ) -> Result<(), InvalidRepeatRule> {
        if repeat_type.is_repeating() {
            RepeatRule::new(repeat_type, repeat_interval)?;
        }
        self.reminder_date = date;
        self.reminder_time = time;
        self.repeat_type = repeat_type;
        self.repeat_interval = if repeat_type.is_repeating() {
            repeat_interval
        } else {
            1
        };
        self.notification_sent = false;
        Ok(())
    }

    pub fn transition(&self) -> Result<NoteTransition, InvalidRepeatRule> {
        match self.repeat_rule()? {
            None => Ok(NoteTransition::MarkSent),
            Some(rule) => {
                let (date, time) = rule.next(self.reminder_date, self.reminder_time)?;
                Ok(NoteTransition::Reschedule { date, time })
            }
        }
    }

    pub fn apply(&mut self, transition: &NoteTransition) {
        match transition {
            NoteTransition::MarkSent => {
                self.notification_sent = true;
            }
            NoteTransition::Reschedule { date, time } => {
                self.reminder_date = *date;
                self.reminder_time = *time;
                self.notification_sent = false;
            }
        }
    }
}

impl Entity for ReminderNote {
    fn id(&self) -> &ID {
        &self.id
    }
}
