//! Debounced autosave scheduler.
//!
//! A single-slot timer expressed as a state machine over explicit
//! timestamps. The owner feeds it the current time and runs the save when it
//! reports a fire; no ambient timer API is involved.
//!
//! ```text
//! Idle --notify_edit--> Pending(now + delay)
//! Pending --notify_edit--> Pending(now + delay)   (previous deadline dropped)
//! Pending --fire_if_due(now >= deadline)--> Idle  (owner saves)
//! any --flush_now--> Idle                          (owner saves)
//! ```

/// Default idle period before an autosave fires.
pub const AUTOSAVE_DELAY_MS: i64 = 350;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveState {
    Idle,
    Pending { deadline_ms: i64 },
}

#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    delay_ms: i64,
    state: AutosaveState,
}

impl AutosaveScheduler {
    pub fn new(delay_ms: i64) -> Self {
        Self {
            delay_ms: delay_ms.max(0),
            state: AutosaveState::Idle,
        }
    }

    /// Arms the timer for `now_ms + delay`, superseding any pending one.
    ///
    /// Returns the new deadline.
    pub fn notify_edit(&mut self, now_ms: i64) -> i64 {
        let deadline_ms = now_ms.saturating_add(self.delay_ms);
        self.state = AutosaveState::Pending { deadline_ms };
        deadline_ms
    }

    /// Fires the timer when its deadline has passed.
    ///
    /// Returns `true` exactly once per armed deadline; the caller must then
    /// run the save.
    pub fn fire_if_due(&mut self, now_ms: i64) -> bool {
        match self.state {
            AutosaveState::Pending { deadline_ms } if now_ms >= deadline_ms => {
                self.state = AutosaveState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Cancels any pending timer ahead of a synchronous save.
    ///
    /// The caller saves regardless; the return value only reports whether a
    /// timer was outstanding.
    pub fn flush_now(&mut self) -> bool {
        self.cancel()
    }

    /// Drops the pending timer without saving.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.state = AutosaveState::Idle;
        was_pending
    }

    pub fn state(&self) -> AutosaveState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AutosaveState::Pending { .. })
    }

    pub fn deadline(&self) -> Option<i64> {
        match self.state {
            AutosaveState::Pending { deadline_ms } => Some(deadline_ms),
            AutosaveState::Idle => None,
        }
    }

    pub fn delay_ms(&self) -> i64 {
        self.delay_ms
    }
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(AUTOSAVE_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::{AutosaveScheduler, AutosaveState, AUTOSAVE_DELAY_MS};

    #[test]
    fn notify_edit_arms_deadline_after_delay() {
        let mut scheduler = AutosaveScheduler::default();
        assert_eq!(scheduler.state(), AutosaveState::Idle);

        let deadline = scheduler.notify_edit(1_000);
        assert_eq!(deadline, 1_000 + AUTOSAVE_DELAY_MS);
        assert_eq!(
            scheduler.state(),
            AutosaveState::Pending {
                deadline_ms: 1_350
            }
        );
    }

    #[test]
    fn rearming_supersedes_previous_deadline() {
        let mut scheduler = AutosaveScheduler::default();
        scheduler.notify_edit(1_000);
        scheduler.notify_edit(1_200);

        assert!(!scheduler.fire_if_due(1_350));
        assert!(scheduler.fire_if_due(1_550));
        assert!(!scheduler.fire_if_due(1_551));
        assert_eq!(scheduler.state(), AutosaveState::Idle);
    }

    #[test]
    fn idle_scheduler_never_fires() {
        let mut scheduler = AutosaveScheduler::default();
        assert!(!scheduler.fire_if_due(i64::MAX));
    }

    #[test]
    fn flush_now_cancels_and_reports_pending_timer() {
        let mut scheduler = AutosaveScheduler::new(100);
        assert!(!scheduler.flush_now());

        scheduler.notify_edit(0);
        assert!(scheduler.flush_now());
        assert_eq!(scheduler.deadline(), None);
        assert!(!scheduler.fire_if_due(1_000));
    }

    #[test]
    fn negative_delay_is_clamped_to_zero() {
        let mut scheduler = AutosaveScheduler::new(-5);
        assert_eq!(scheduler.delay_ms(), 0);
        scheduler.notify_edit(10);
        assert!(scheduler.fire_if_due(10));
    }
}
