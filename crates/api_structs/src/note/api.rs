use crate::dtos::ReminderNoteDTO;
use chrono::{NaiveDate, NaiveTime};
use remindr_domain::{reminder_date_format, reminder_time_format, ReminderNote, RepeatType, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderNoteResponse {
    pub note: ReminderNoteDTO,
}

impl ReminderNoteResponse {
    pub fn new(note: ReminderNote) -> Self {
        Self {
            note: ReminderNoteDTO::new(note),
        }
    }
}

mod optional_date_format {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => reminder_date_format::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => remindr_domain::parse_reminder_date(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

mod optional_time_format {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => reminder_time_format::serialize(time, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => remindr_domain::parse_reminder_time(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

fn default_repeat_interval() -> i64 {
    1
}

pub mod create_note {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        #[serde(default)]
        pub content: String,
        #[serde(with = "reminder_date_format")]
        pub reminder_date: NaiveDate,
        #[serde(with = "reminder_time_format")]
        pub reminder_time: NaiveTime,
        #[serde(default)]
        pub repeat_type: RepeatType,
        #[serde(default = "default_repeat_interval")]
        pub repeat_interval: i64,
    }

    pub type APIResponse = ReminderNoteResponse;
}

pub mod get_note {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub note_id: ID,
    }

    pub type APIResponse = ReminderNoteResponse;
}

pub mod get_notes {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notes: Vec<ReminderNoteDTO>,
    }

    impl APIResponse {
        pub fn new(notes: Vec<ReminderNote>) -> Self {
            Self {
                notes: notes.into_iter().map(ReminderNoteDTO::new).collect(),
            }
        }
    }
}

pub mod update_note {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub note_id: ID,
    }

    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub content: Option<String>,
        #[serde(default, with = "optional_date_format")]
        pub reminder_date: Option<NaiveDate>,
        #[serde(default, with = "optional_time_format")]
        pub reminder_time: Option<NaiveTime>,
        #[serde(default)]
        pub repeat_type: Option<RepeatType>,
        #[serde(default)]
        pub repeat_interval: Option<i64>,
    }

    pub type APIResponse = ReminderNoteResponse;
}

pub mod delete_note {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub note_id: ID,
    }

    pub type APIResponse = ReminderNoteResponse;
}
