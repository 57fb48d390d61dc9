mod inmemory;
mod postgres;

use chrono::{DateTime, Utc};
pub use inmemory::InMemoryNoteRepo;
pub use postgres::PostgresNoteRepo;
use remindr_domain::{NoteTransition, ReminderNote, ID};

/// Exclusive right of one dispatch cycle to deliver the current occurrence of a note
#[derive(Debug, Clone)]
pub struct NoteClaim {
    pub token: ID,
    /// The instant the claiming dispatch cycle runs at
    pub now: DateTime<Utc>,
    /// After this instant the claim can be taken over by another cycle
    pub until: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait INoteRepo: Send + Sync {
    async fn insert(&self, note: &ReminderNote) -> anyhow::Result<()>;
    /// Stores a user edit of the schedule together with the content. Resets the
    /// delivery state to what `note` holds and drops any claim held on the note.
    async fn save(&self, note: &ReminderNote) -> anyhow::Result<()>;
    /// Stores a user edit of title and content only. The schedule, the delivery
    /// state and any claim are left as they are in storage.
    async fn update_content(&self, note: &ReminderNote) -> anyhow::Result<()>;
    async fn find(&self, note_id: &ID) -> anyhow::Result<Option<ReminderNote>>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ReminderNote>>;
    async fn delete(&self, note_id: &ID) -> anyhow::Result<Option<ReminderNote>>;
    /// Pending notes whose reminder instant is at or before `now` and which no
    /// cycle holds an unexpired claim on, oldest first
    async fn find_due(&self, now: DateTime<Utc>, limit: usize)
        -> anyhow::Result<Vec<ReminderNote>>;
    /// Claims a note that is still due and not claimed by anyone else.
    /// Returns false when the claim was not acquired.
    async fn claim(&self, note_id: &ID, claim: &NoteClaim) -> anyhow::Result<bool>;
    /// Gives up a claim without changing the note
    async fn release(&self, note_id: &ID, claim_token: &ID) -> anyhow::Result<()>;
    /// Applies the transition and releases the claim in one write. Returns false
    /// when the claim is no longer held, in which case nothing is written.
    async fn finalize(
        &self,
        note_id: &ID,
        claim_token: &ID,
        transition: &NoteTransition,
    ) -> anyhow::Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
    use remindr_domain::RepeatType;

    fn note_at(user_id: &ID, date: NaiveDate, time: NaiveTime) -> ReminderNote {
        ReminderNote::new(
            user_id.clone(),
            "Pay rent".into(),
            "Transfer to landlord".into(),
            date,
            time,
            0,
        )
    }

    fn march_first() -> (NaiveDate, NaiveTime) {
        (
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
    }

    fn claim_at(now: DateTime<Utc>) -> NoteClaim {
        NoteClaim {
            token: ID::new(),
            now,
            until: now + Duration::minutes(5),
        }
    }

    #[tokio::test]
    async fn due_set_boundary_is_inclusive() {
        let repo = InMemoryNoteRepo::new();
        let user_id = ID::new();
        let (date, time) = march_first();
        let note = note_at(&user_id, date, time);
        repo.insert(&note).await.unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let due = repo.find_due(now, 100).await.unwrap();
        assert_eq!(due.len(), 1);

        let just_before = now - Duration::microseconds(1);
        assert!(repo.find_due(just_before, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sent_notes_are_never_due() {
        let repo = InMemoryNoteRepo::new();
        let (date, time) = march_first();
        let mut note = note_at(&ID::new(), date, time);
        note.notification_sent = true;
        repo.insert(&note).await.unwrap();

        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert!(repo.find_due(now, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn due_set_is_ordered_and_limited() {
        let repo = InMemoryNoteRepo::new();
        let user_id = ID::new();
        let (date, time) = march_first();
        let later = note_at(&user_id, date, time + Duration::hours(1));
        let earlier = note_at(&user_id, date, time);
        repo.insert(&later).await.unwrap();
        repo.insert(&earlier).await.unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let due = repo.find_due(now, 100).await.unwrap();
        assert_eq!(
            due.iter().map(|n| n.id.clone()).collect::<Vec<_>>(),
            vec![earlier.id.clone(), later.id.clone()]
        );
        let due = repo.find_due(now, 1).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, earlier.id);
    }

    #[tokio::test]
    async fn claim_is_exclusive_until_released_or_expired() {
        let repo = InMemoryNoteRepo::new();
        let (date, time) = march_first();
        let note = note_at(&ID::new(), date, time);
        repo.insert(&note).await.unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let first = claim_at(now);
        let second = claim_at(now);
        assert!(repo.claim(&note.id, &first).await.unwrap());
        assert!(!repo.claim(&note.id, &second).await.unwrap());

        repo.release(&note.id, &first.token).await.unwrap();
        assert!(repo.claim(&note.id, &second).await.unwrap());

        // The lease of `second` has passed
        let much_later = claim_at(now + Duration::minutes(10));
        assert!(repo.claim(&note.id, &much_later).await.unwrap());
    }

    #[tokio::test]
    async fn claim_requires_note_to_still_be_due() {
        let repo = InMemoryNoteRepo::new();
        let (date, time) = march_first();
        let note = note_at(&ID::new(), date, time);
        repo.insert(&note).await.unwrap();

        let before_due = Utc.with_ymd_and_hms(2024, 3, 1, 8, 59, 0).unwrap();
        assert!(!repo.claim(&note.id, &claim_at(before_due)).await.unwrap());
        assert!(!repo
            .claim(&ID::new(), &claim_at(before_due))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn finalize_needs_the_claim() {
        let repo = InMemoryNoteRepo::new();
        let (date, time) = march_first();
        let mut note = note_at(&ID::new(), date, time);
        note.repeat_type = RepeatType::Daily;
        note.repeat_interval = 2;
        repo.insert(&note).await.unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let claim = claim_at(now);
        let transition = note.transition().unwrap();

        assert!(!repo
            .finalize(&note.id, &ID::new(), &transition)
            .await
            .unwrap());
        assert!(repo.claim(&note.id, &claim).await.unwrap());
        assert!(repo
            .finalize(&note.id, &claim.token, &transition)
            .await
            .unwrap());
        // A second write with the same claim is a no-op
        assert!(!repo
            .finalize(&note.id, &claim.token, &transition)
            .await
            .unwrap());

        let stored = repo.find(&note.id).await.unwrap().unwrap();
        assert_eq!(stored.reminder_date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert!(!stored.notification_sent);
    }

    #[tokio::test]
    async fn schedule_edit_drops_claim() {
        let repo = InMemoryNoteRepo::new();
        let (date, time) = march_first();
        let mut note = note_at(&ID::new(), date, time);
        repo.insert(&note).await.unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let claim = claim_at(now);
        assert!(repo.claim(&note.id, &claim).await.unwrap());

        note.title = "Pay rent today".into();
        repo.update_content(&note).await.unwrap();
        // Content edits keep the claim
        assert!(!repo.claim(&note.id, &claim_at(now)).await.unwrap());

        note.reminder_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        repo.save(&note).await.unwrap();
        assert!(!repo
            .finalize(&note.id, &claim.token, &NoteTransition::MarkSent)
            .await
            .unwrap());
        assert!(!repo.find(&note.id).await.unwrap().unwrap().notification_sent);
    }

    #[tokio::test]
    async fn claimed_notes_are_left_out_of_the_due_set() {
        let repo = InMemoryNoteRepo::new();
        let user_id = ID::new();
        let (date, time) = march_first();
        let claimed = note_at(&user_id, date, time);
        let free = note_at(&user_id, date, time + Duration::minutes(1));
        repo.insert(&claimed).await.unwrap();
        repo.insert(&free).await.unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert!(repo.claim(&claimed.id, &claim_at(now)).await.unwrap());

        let due = repo.find_due(now, 1).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, free.id);

        // Back in the due set once the lease has passed
        let due = repo
            .find_due(now + Duration::minutes(6), 100)
            .await
            .unwrap();
        assert_eq!(due.len(), 2);
    }

    #[tokio::test]
    async fn content_edit_from_stale_read_keeps_delivery_state() {
        let repo = InMemoryNoteRepo::new();
        let (date, time) = march_first();
        let note = note_at(&ID::new(), date, time);
        repo.insert(&note).await.unwrap();

        let mut stale = repo.find(&note.id).await.unwrap().unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let claim = claim_at(now);
        assert!(repo.claim(&note.id, &claim).await.unwrap());
        assert!(repo
            .finalize(&note.id, &claim.token, &NoteTransition::MarkSent)
            .await
            .unwrap());

        stale.title = "Pay rent, again".into();
        repo.update_content(&stale).await.unwrap();

        let stored = repo.find(&note.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Pay rent, again");
        assert!(stored.notification_sent);
        assert!(repo.find_due(now, 100).await.unwrap().is_empty());
    }
}
