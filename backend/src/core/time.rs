//! Virtual clock and continuation scheduler
//!
//! The simulation advances in continuous virtual time (minutes). Pending
//! continuations are kept in a min-heap keyed by `(timestamp, sequence)`, so
//! equal timestamps resume in the order they were scheduled.
//!
//! The scheduler is generic over the continuation payload; the engine uses
//! [`crate::orchestrator::SimEvent`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

/// Errors raised when scheduling a continuation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid delay {0}: must be finite and >= 0")]
    InvalidDelay(f64),
}

/// A continuation waiting in the scheduler
#[derive(Debug, Clone)]
pub struct Scheduled<E> {
    /// Virtual time at which the continuation resumes
    pub at: f64,
    /// Insertion order, used to break timestamp ties
    pub seq: u64,
    pub event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> Ord for Scheduled<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the earliest (at, seq) first.
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Virtual clock plus ordered set of pending continuations
///
/// # Example
/// ```
/// use airport_simulator_core_rs::Scheduler;
///
/// let mut clock: Scheduler<&str> = Scheduler::new();
/// clock.schedule_after(2.0, "second").unwrap();
/// clock.schedule_after(1.0, "first").unwrap();
///
/// let mut order = Vec::new();
/// clock.run(10.0, |_, ev| order.push(ev));
/// assert_eq!(order, vec!["first", "second"]);
/// assert_eq!(clock.now(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<Scheduled<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    /// Create a scheduler at time zero with nothing pending
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of pending continuations
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Timestamp of the earliest pending continuation
    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek().map(|s| s.at)
    }

    /// Schedule `event` to resume `delay` minutes from now
    ///
    /// # Errors
    ///
    /// `SchedulerError::InvalidDelay` if `delay` is negative, NaN or infinite.
    pub fn schedule_after(&mut self, delay: f64, event: E) -> Result<(), SchedulerError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(SchedulerError::InvalidDelay(delay));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            at: self.now + delay,
            seq,
            event,
        });
        Ok(())
    }

    /// Pop the earliest continuation if it is due at or before `horizon`
    ///
    /// Advances the clock to the continuation's timestamp (capped at the
    /// horizon). Returns `None`, leaving the queue untouched, when nothing is
    /// due.
    pub fn pop_due(&mut self, horizon: f64) -> Option<Scheduled<E>> {
        match self.queue.peek() {
            Some(top) if top.at <= horizon => {}
            _ => return None,
        }
        let item = self.queue.pop()?;
        self.now = self.now.max(item.at.min(horizon));
        Some(item)
    }

    /// Move the clock forward to `t`. Never moves backward.
    pub fn advance_to(&mut self, t: f64) {
        if t > self.now {
            self.now = t;
        }
    }

    /// Resume continuations in order until none is due at or before `until`
    ///
    /// Each resumed continuation may schedule more through the `&mut Self`
    /// handed to `resume`. The clock rests at `until` afterwards. Returns the
    /// number of continuations resumed.
    pub fn run<F>(&mut self, until: f64, mut resume: F) -> usize
    where
        F: FnMut(&mut Self, E),
    {
        let mut resumed = 0;
        while let Some(item) = self.pop_due(until) {
            resume(self, item.event);
            resumed += 1;
        }
        self.advance_to(until);
        resumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut clock = Scheduler::new();
        clock.schedule_after(10.0, 'c').unwrap();
        clock.schedule_after(5.0, 'a').unwrap();
        clock.schedule_after(7.5, 'b').unwrap();

        let first = clock.pop_due(100.0).expect("first");
        assert_eq!(first.event, 'a');
        assert_eq!(clock.now(), 5.0);

        let second = clock.pop_due(100.0).expect("second");
        assert_eq!(second.event, 'b');
        assert_eq!(clock.now(), 7.5);

        let third = clock.pop_due(100.0).expect("third");
        assert_eq!(third.event, 'c');
        assert_eq!(clock.now(), 10.0);

        assert!(clock.pop_due(100.0).is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn test_ties_resume_in_insertion_order() {
        let mut clock = Scheduler::new();
        for i in 0..5 {
            clock.schedule_after(1.0, i).unwrap();
        }
        let mut seen = Vec::new();
        clock.run(1.0, |_, ev| seen.push(ev));
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_pop_due_respects_horizon() {
        let mut clock = Scheduler::new();
        clock.schedule_after(3.0, ()).unwrap();
        assert!(clock.pop_due(2.9).is_none());
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.now(), 0.0);
        assert!(clock.pop_due(3.0).is_some());
    }

    #[test]
    fn test_rejects_bad_delays() {
        let mut clock: Scheduler<()> = Scheduler::new();
        assert_eq!(
            clock.schedule_after(-1.0, ()),
            Err(SchedulerError::InvalidDelay(-1.0))
        );
        assert!(clock.schedule_after(f64::NAN, ()).is_err());
        assert!(clock.schedule_after(f64::INFINITY, ()).is_err());
        assert!(clock.is_empty());
    }

    #[test]
    fn test_advance_to_never_moves_backward() {
        let mut clock: Scheduler<()> = Scheduler::new();
        clock.advance_to(5.0);
        clock.advance_to(2.0);
        assert_eq!(clock.now(), 5.0);
    }
}
