use super::{INoteRepo, NoteClaim};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use remindr_domain::{InvalidRepeatRule, NoteTransition, ReminderNote, RepeatType, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresNoteRepo {
    pool: PgPool,
}

impl PostgresNoteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NoteRaw {
    note_uid: Uuid,
    user_uid: Uuid,
    title: String,
    content: String,
    reminder_date: NaiveDate,
    reminder_time: NaiveTime,
    repeat_type: String,
    repeat_interval: i64,
    notification_sent: bool,
    created: i64,
    updated: i64,
}

impl TryFrom<NoteRaw> for ReminderNote {
    type Error = InvalidRepeatRule;

    fn try_from(raw: NoteRaw) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.note_uid.into(),
            user_id: raw.user_uid.into(),
            title: raw.title,
            content: raw.content,
            reminder_date: raw.reminder_date,
            reminder_time: raw.reminder_time,
            repeat_type: raw.repeat_type.parse::<RepeatType>()?,
            repeat_interval: raw.repeat_interval,
            notification_sent: raw.notification_sent,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

/// Rows with a corrupt repeat type are reported and left out
fn into_notes(rows: Vec<NoteRaw>) -> Vec<ReminderNote> {
    rows.into_iter()
        .filter_map(|raw| {
            let note_uid = raw.note_uid;
            match ReminderNote::try_from(raw) {
                Ok(note) => Some(note),
                Err(e) => {
                    error!("Skipping reminder note {} with invalid data: {}", note_uid, e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl INoteRepo for PostgresNoteRepo {
    async fn insert(&self, note: &ReminderNote) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminder_notes
            (note_uid, user_uid, title, content, reminder_date, reminder_time, repeat_type, repeat_interval, notification_sent, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(note.id.inner_ref())
        .bind(note.user_id.inner_ref())
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.reminder_date)
        .bind(note.reminder_time)
        .bind(note.repeat_type.as_str())
        .bind(note.repeat_interval)
        .bind(note.notification_sent)
        .bind(note.created)
        .bind(note.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, note: &ReminderNote) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_notes
            SET claim_token = CASE
                    WHEN reminder_date = $5 AND reminder_time = $6
                        AND repeat_type = $7 AND repeat_interval = $8
                    THEN claim_token
                    ELSE NULL
                END,
                claimed_until = CASE
                    WHEN reminder_date = $5 AND reminder_time = $6
                        AND repeat_type = $7 AND repeat_interval = $8
                    THEN claimed_until
                    ELSE NULL
                END,
                title = $3,
                content = $4,
                reminder_date = $5,
                reminder_time = $6,
                repeat_type = $7,
                repeat_interval = $8,
                notification_sent = $9,
                updated = $10
            WHERE note_uid = $1 AND user_uid = $2
            "#,
        )
        .bind(note.id.inner_ref())
        .bind(note.user_id.inner_ref())
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.reminder_date)
        .bind(note.reminder_time)
        .bind(note.repeat_type.as_str())
        .bind(note.repeat_interval)
        .bind(note.notification_sent)
        .bind(note.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_content(&self, note: &ReminderNote) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_notes
            SET title = $3,
                content = $4,
                updated = $5
            WHERE note_uid = $1 AND user_uid = $2
            "#,
        )
        .bind(note.id.inner_ref())
        .bind(note.user_id.inner_ref())
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, note_id: &ID) -> anyhow::Result<Option<ReminderNote>> {
        let raw = sqlx::query_as::<_, NoteRaw>(
            r#"
            SELECT * FROM reminder_notes AS n
            WHERE n.note_uid = $1
            "#,
        )
        .bind(note_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(raw.and_then(|raw| into_notes(vec![raw]).pop()))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ReminderNote>> {
        let rows = sqlx::query_as::<_, NoteRaw>(
            r#"
            SELECT * FROM reminder_notes AS n
            WHERE n.user_uid = $1
            ORDER BY n.reminder_date, n.reminder_time
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        Ok(into_notes(rows))
    }

    async fn delete(&self, note_id: &ID) -> anyhow::Result<Option<ReminderNote>> {
        let raw = sqlx::query_as::<_, NoteRaw>(
            r#"
            DELETE FROM reminder_notes AS n
            WHERE n.note_uid = $1
            RETURNING *
            "#,
        )
        .bind(note_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(raw.and_then(|raw| into_notes(vec![raw]).pop()))
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<ReminderNote>> {
        let rows = sqlx::query_as::<_, NoteRaw>(
            r#"
            SELECT * FROM reminder_notes AS n
            WHERE n.notification_sent = false
            AND (n.reminder_date + n.reminder_time) <= $1
            AND (n.claimed_until IS NULL OR n.claimed_until < $3)
            ORDER BY n.reminder_date, n.reminder_time
            LIMIT $2
            "#,
        )
        .bind(now.naive_utc())
        .bind(limit as i64)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(into_notes(rows))
    }

    async fn claim(&self, note_id: &ID, claim: &NoteClaim) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminder_notes
            SET claim_token = $2,
                claimed_until = $3
            WHERE note_uid = $1
            AND notification_sent = false
            AND (reminder_date + reminder_time) <= $4
            AND (claimed_until IS NULL OR claimed_until < $5)
            "#,
        )
        .bind(note_id.inner_ref())
        .bind(claim.token.inner_ref())
        .bind(claim.until)
        .bind(claim.now.naive_utc())
        .bind(claim.now)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn release(&self, note_id: &ID, claim_token: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_notes
            SET claim_token = NULL,
                claimed_until = NULL
            WHERE note_uid = $1 AND claim_token = $2
            "#,
        )
        .bind(note_id.inner_ref())
        .bind(claim_token.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn finalize(
        &self,
        note_id: &ID,
        claim_token: &ID,
        transition: &NoteTransition,
    ) -> anyhow::Result<bool> {
        let res = match transition {
            NoteTransition::MarkSent => {
                sqlx::query(
                    r#"
                    UPDATE reminder_notes
                    SET notification_sent = true,
                        claim_token = NULL,
                        claimed_until = NULL
                    WHERE note_uid = $1 AND claim_token = $2
                    "#,
                )
                .bind(note_id.inner_ref())
                .bind(claim_token.inner_ref())
                .execute(&self.pool)
                .await?
            }
            NoteTransition::Reschedule { date, time } => {
                sqlx::query(
                    r#"
                    UPDATE reminder_notes
                    SET reminder_date = $3,
                        reminder_time = $4,
                        notification_sent = false,
                        claim_token = NULL,
                        claimed_until = NULL
                    WHERE note_uid = $1 AND claim_token = $2
                    "#,
                )
                .bind(note_id.inner_ref())
                .bind(claim_token.inner_ref())
                .bind(*date)
                .bind(*time)
                .execute(&self.pool)
                .await?
            }
        };
        Ok(res.rows_affected() == 1)
    }
}
