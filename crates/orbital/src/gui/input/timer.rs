use std::time::{Duration, Instant};

/// A single cancellable deadline. Scheduling replaces any pending deadline, so a
/// superseded callback can never fire late.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fires at most once per schedule: true if the deadline has passed, clearing it.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(300));
        timer.schedule(start);
        assert!(!timer.take_due(start + Duration::from_millis(299)));
        assert!(timer.take_due(start + Duration::from_millis(300)));
        assert!(!timer.take_due(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_reschedule_is_trailing() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(300));
        timer.schedule(start);
        timer.schedule(start + Duration::from_millis(200));
        assert!(!timer.take_due(start + Duration::from_millis(350)));
        assert!(timer.take_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(50));
        timer.schedule(start);
        timer.cancel();
        assert_eq!(timer.deadline(), None);
        assert!(!timer.take_due(start + Duration::from_secs(1)));
    }
}
