//! Time-bounded "copied" feedback.
//!
//! `Idle → Copied` on a successful copy; `Copied → Idle` when the delay
//! elapses or when the owner is dropped. A copy while already `Copied`
//! restarts the delay.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// The feedback axis of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackState {
    Idle,
    Copied,
}

#[derive(Debug)]
struct Shared {
    state: FeedbackState,
    /// Bumped on every transition so a superseded timer cannot reset a newer
    /// `Copied`.
    generation: u64,
}

/// Copy-feedback state machine with its expiry timer.
///
/// The timer is a tokio task, so [`CopyFeedback::mark_copied`] must be called
/// from within a runtime.
#[derive(Debug)]
pub struct CopyFeedback {
    shared: Arc<Mutex<Shared>>,
    delay: Duration,
    timer: Option<JoinHandle<()>>,
}

impl CopyFeedback {
    pub fn new(delay: Duration) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: FeedbackState::Idle,
                generation: 0,
            })),
            delay,
            timer: None,
        }
    }

    pub fn state(&self) -> FeedbackState {
        lock(&self.shared).state
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Enter `Copied` and (re)arm the reset timer.
    pub fn mark_copied(&mut self) {
        self.abort_timer();

        let generation = {
            let mut shared = lock(&self.shared);
            shared.state = FeedbackState::Copied;
            shared.generation += 1;
            shared.generation
        };

        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut shared = lock(&shared);
            if shared.generation == generation {
                shared.state = FeedbackState::Idle;
            }
        }));
    }

    /// Cancel any pending timer and return to `Idle` immediately.
    pub fn reset(&mut self) {
        self.abort_timer();
        let mut shared = lock(&self.shared);
        shared.state = FeedbackState::Idle;
        shared.generation += 1;
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for CopyFeedback {
    fn drop(&mut self) {
        self.reset();
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
