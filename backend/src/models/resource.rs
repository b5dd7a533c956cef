//! Bounded-concurrency admission primitive
//!
//! A `Resource` admits at most `capacity` concurrent holders. Everyone else
//! waits in a strict FIFO queue; nothing ever reorders it by passenger class
//! or urgency.
//!
//! # Critical Invariants
//!
//! 1. `held <= capacity` at all times
//! 2. A released slot goes to the longest-waiting requester, handed over
//!    directly so no later arrival can take it in between
//! 3. Waiting has no timeout; abandonment is the engine's business

use crate::models::passenger::PassengerId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors raised by resource bookkeeping
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceError {
    #[error("Release called with no slot held")]
    NotHeld,
    #[error("Resource capacity must be at least 1")]
    ZeroCapacity,
}

/// Outcome of an `acquire` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A slot was free; the requester holds it now
    Granted,
    /// All slots busy; the requester waits at this 0-based queue position
    Queued { position: usize },
}

/// Bounded resource with FIFO waiting
///
/// # Example
///
/// ```rust
/// use airport_simulator_core_rs::models::{Admission, PassengerId, Resource};
///
/// let mut desk = Resource::new(1).unwrap();
/// assert_eq!(desk.acquire(PassengerId(1)), Admission::Granted);
/// assert_eq!(desk.acquire(PassengerId(2)), Admission::Queued { position: 0 });
///
/// // Slot handed straight to the waiter
/// assert_eq!(desk.release().unwrap(), Some(PassengerId(2)));
/// assert_eq!(desk.held(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    capacity: usize,
    held: usize,
    waiting: VecDeque<PassengerId>,
}

impl Resource {
    /// # Errors
    ///
    /// `ResourceError::ZeroCapacity` if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self, ResourceError> {
        if capacity == 0 {
            return Err(ResourceError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            held: 0,
            waiting: VecDeque::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held
    pub fn held(&self) -> usize {
        self.held
    }

    /// Requesters waiting for a slot
    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Waiting requesters, longest-waiting first
    pub fn waiting(&self) -> impl Iterator<Item = &PassengerId> {
        self.waiting.iter()
    }

    /// Request a slot
    pub fn acquire(&mut self, requester: PassengerId) -> Admission {
        if self.held < self.capacity {
            self.held += 1;
            Admission::Granted
        } else {
            self.waiting.push_back(requester);
            Admission::Queued {
                position: self.waiting.len() - 1,
            }
        }
    }

    /// Give a slot back
    ///
    /// Returns the waiter that now holds the freed slot, if any.
    ///
    /// # Errors
    ///
    /// `ResourceError::NotHeld` if no slot is held.
    pub fn release(&mut self) -> Result<Option<PassengerId>, ResourceError> {
        if self.held == 0 {
            return Err(ResourceError::NotHeld);
        }
        match self.waiting.pop_front() {
            Some(next) => Ok(Some(next)),
            None => {
                self.held -= 1;
                Ok(None)
            }
        }
    }
}
