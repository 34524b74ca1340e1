//! Trailing-edge debouncer.
//!
//! A small explicit state machine: either `Idle` or `Pending` with a
//! deadline and the latest scheduled value. Repeated schedules within the
//! window collapse into one eventual fire carrying the most recent value;
//! nothing fires on the leading edge. `flush` takes whatever is pending
//! immediately, for deliberate checkpoints.

use tokio::time::{Duration, Instant};

#[derive(Debug)]
enum State<T> {
    Idle,
    Pending { deadline: Instant, latest: T },
}

/// Coalesces a burst of values into a single delivery after a quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    state: State<T>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: State::Idle,
        }
    }

    /// Record a value and (re)arm the deadline at `now + window`. An earlier
    /// pending value is replaced, never delivered.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.state = State::Pending {
            deadline: now + self.window,
            latest: value,
        };
    }

    /// The instant the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            State::Idle => None,
            State::Pending { deadline, .. } => Some(*deadline),
        }
    }

    /// Take the pending value if its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.state {
            State::Pending { deadline, .. } if *deadline <= now => self.take(),
            _ => None,
        }
    }

    /// Take the pending value immediately, regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.take()
    }

    fn take(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::Pending { latest, .. } => Some(latest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(150);

    #[test]
    fn does_not_fire_before_the_quiet_period_elapses() {
        let mut debouncer = Debouncer::new(WINDOW);
        let base = Instant::now();

        debouncer.schedule("s0", base);
        assert_eq!(debouncer.fire(base), None);
        assert_eq!(debouncer.fire(base + Duration::from_millis(149)), None);
        assert_eq!(debouncer.fire(base + WINDOW), Some("s0"));
    }

    #[test]
    fn burst_coalesces_into_the_latest_value() {
        let mut debouncer = Debouncer::new(WINDOW);
        let base = Instant::now();

        debouncer.schedule("s0", base);
        debouncer.schedule("s1", base + Duration::from_millis(50));

        // s0's deadline has passed, but s1 rescheduled the fire time.
        assert_eq!(debouncer.fire(base + Duration::from_millis(160)), None);
        assert_eq!(debouncer.fire(base + Duration::from_millis(200)), Some("s1"));
        // One physical delivery per burst.
        assert_eq!(debouncer.fire(base + Duration::from_millis(400)), None);
    }

    #[test]
    fn flush_takes_the_pending_value_immediately() {
        let mut debouncer = Debouncer::new(WINDOW);
        let base = Instant::now();

        assert_eq!(debouncer.flush(), None::<&str>);
        debouncer.schedule("s0", base);
        assert_eq!(debouncer.flush(), Some("s0"));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn deadline_tracks_the_last_schedule() {
        let mut debouncer = Debouncer::new(WINDOW);
        let base = Instant::now();

        assert_eq!(debouncer.deadline(), None);
        debouncer.schedule("s0", base);
        assert_eq!(debouncer.deadline(), Some(base + WINDOW));
        debouncer.schedule("s1", base + Duration::from_millis(50));
        assert_eq!(
            debouncer.deadline(),
            Some(base + Duration::from_millis(50) + WINDOW)
        );
    }
}
