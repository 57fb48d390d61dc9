use remindr_domain::ID;
use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::task::JoinHandle;

type TimerMap = HashMap<ID, (u64, JoinHandle<()>)>;

/// Process scoped one-shot timers keyed by note id.
///
/// Scheduling a timer for a note that already has one replaces (and cancels)
/// the old timer. A timer removes itself from the registry when it fires.
#[derive(Default)]
pub struct FallbackTimers {
    timers: Arc<Mutex<TimerMap>>,
    generation: AtomicU64,
}

impl FallbackTimers {
    pub fn new() -> Self {
        Default::default()
    }

    /// Runs `task` after `delay` unless the timer is cancelled or replaced first.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, note_id: ID, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        let timer_note_id = note_id.clone();

        let mut registry = self.timers.lock().unwrap();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let still_scheduled = {
                let mut registry = timers.lock().unwrap();
                match registry.get(&timer_note_id) {
                    Some((g, _)) if *g == generation => {
                        registry.remove(&timer_note_id);
                        true
                    }
                    _ => false,
                }
            };
            if still_scheduled {
                task.await;
            }
        });

        if let Some((_, replaced)) = registry.insert(note_id, (generation, handle)) {
            replaced.abort();
        }
    }

    /// Returns true if there was a pending timer for the note
    pub fn cancel(&self, note_id: &ID) -> bool {
        match self.timers.lock().unwrap().remove(note_id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, note_id: &ID) -> bool {
        self.timers.lock().unwrap().contains_key(note_id)
    }

    pub fn len(&self) -> usize {
        self.timers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_task(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn fires_once_and_unregisters() {
        let timers = FallbackTimers::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let note_id = ID::new();

        timers.schedule(note_id.clone(), Duration::from_millis(10), counter_task(&fired));
        assert!(timers.is_scheduled(&note_id));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(timers.is_empty());
    }

    #[tokio::test]
    async fn cancelled_timer_never_fires() {
        let timers = FallbackTimers::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let note_id = ID::new();

        timers.schedule(note_id.clone(), Duration::from_millis(20), counter_task(&fired));
        assert!(timers.cancel(&note_id));
        assert!(!timers.cancel(&note_id));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rescheduling_replaces_previous_timer() {
        let timers = FallbackTimers::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let note_id = ID::new();

        timers.schedule(note_id.clone(), Duration::from_millis(20), counter_task(&first));
        timers.schedule(note_id.clone(), Duration::from_millis(40), counter_task(&second));
        assert_eq!(timers.len(), 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert!(timers.is_empty());
    }
}
