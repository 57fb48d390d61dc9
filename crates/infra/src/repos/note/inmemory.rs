use super::{INoteRepo, NoteClaim};
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use remindr_domain::{NoteTransition, ReminderNote, ID};
use std::{collections::HashMap, sync::Mutex};

struct HeldClaim {
    token: ID,
    until: DateTime<Utc>,
}

pub struct InMemoryNoteRepo {
    notes: Mutex<Vec<ReminderNote>>,
    claims: Mutex<HashMap<ID, HeldClaim>>,
}

impl InMemoryNoteRepo {
    pub fn new() -> Self {
        Self {
            notes: Mutex::new(vec![]),
            claims: Mutex::new(HashMap::new()),
        }
    }
}

fn same_schedule(a: &ReminderNote, b: &ReminderNote) -> bool {
    a.reminder_date == b.reminder_date
        && a.reminder_time == b.reminder_time
        && a.repeat_type == b.repeat_type
        && a.repeat_interval == b.repeat_interval
}

#[async_trait::async_trait]
impl INoteRepo for InMemoryNoteRepo {
    async fn insert(&self, note: &ReminderNote) -> anyhow::Result<()> {
        insert(note, &self.notes);
        Ok(())
    }

    async fn save(&self, note: &ReminderNote) -> anyhow::Result<()> {
        let schedule_changed = match find(&note.id, &self.notes) {
            Some(stored) => !same_schedule(&stored, note),
            None => false,
        };
        save(note, &self.notes);
        if schedule_changed {
            self.claims.lock().unwrap().remove(&note.id);
        }
        Ok(())
    }

    async fn update_content(&self, note: &ReminderNote) -> anyhow::Result<()> {
        let mut notes = self.notes.lock().unwrap();
        if let Some(stored) = notes.iter_mut().find(|n| n.id == note.id) {
            stored.title = note.title.clone();
            stored.content = note.content.clone();
            stored.updated = note.updated;
        }
        Ok(())
    }

    async fn find(&self, note_id: &ID) -> anyhow::Result<Option<ReminderNote>> {
        Ok(find(note_id, &self.notes))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ReminderNote>> {
        let mut notes = find_by(&self.notes, |n| n.user_id == *user_id);
        notes.sort_by_key(|n| n.reminder_at());
        Ok(notes)
    }

    async fn delete(&self, note_id: &ID) -> anyhow::Result<Option<ReminderNote>> {
        self.claims.lock().unwrap().remove(note_id);
        Ok(delete(note_id, &self.notes))
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<ReminderNote>> {
        let claimed: Vec<ID> = self
            .claims
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, held)| held.until >= now)
            .map(|(note_id, _)| note_id.clone())
            .collect();
        let mut due = find_by(&self.notes, |n| n.is_due(&now) && !claimed.contains(&n.id));
        due.sort_by_key(|n| n.reminder_at());
        due.truncate(limit);
        Ok(due)
    }

    async fn claim(&self, note_id: &ID, claim: &NoteClaim) -> anyhow::Result<bool> {
        let notes = self.notes.lock().unwrap();
        let still_due = notes
            .iter()
            .any(|n| n.id == *note_id && n.is_due(&claim.now));
        if !still_due {
            return Ok(false);
        }

        let mut claims = self.claims.lock().unwrap();
        if let Some(held) = claims.get(note_id) {
            if held.until >= claim.now {
                return Ok(false);
            }
        }
        claims.insert(
            note_id.clone(),
            HeldClaim {
                token: claim.token.clone(),
                until: claim.until,
            },
        );
        Ok(true)
    }

    async fn release(&self, note_id: &ID, claim_token: &ID) -> anyhow::Result<()> {
        let mut claims = self.claims.lock().unwrap();
        if matches!(claims.get(note_id), Some(held) if held.token == *claim_token) {
            claims.remove(note_id);
        }
        Ok(())
    }

    async fn finalize(
        &self,
        note_id: &ID,
        claim_token: &ID,
        transition: &NoteTransition,
    ) -> anyhow::Result<bool> {
        let mut notes = self.notes.lock().unwrap();
        let mut claims = self.claims.lock().unwrap();
        match claims.get(note_id) {
            Some(held) if held.token == *claim_token => {}
            _ => return Ok(false),
        }
        claims.remove(note_id);
        match notes.iter_mut().find(|n| n.id == *note_id) {
            Some(note) => {
                note.apply(transition);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
