//! Pending mutation records and their lifecycle.
//!
//! A mutation is created `Queued` when the form is submitted, becomes
//! `Submitting` once the request is on the wire, and ends `Resolved` or
//! `Failed` when the response is observed. Ended records leave the tracker;
//! only outstanding ones are kept.

use std::fmt;
use std::time::{Duration, Instant};

use gemcart_core::CartMutation;
use thiserror::Error;

/// Submission sequence number. Later submissions compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MutationId(u64);

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Queued,
    Submitting,
    Resolved,
    Failed,
}

impl MutationState {
    #[must_use]
    pub fn is_outstanding(self) -> bool {
        matches!(self, Self::Queued | Self::Submitting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub id: MutationId,
    pub mutation: CartMutation,
    pub state: MutationState,
    pub submitted_at: Instant,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("no outstanding mutation {0}")]
    UnknownMutation(MutationId),

    #[error("mutation {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: MutationId,
        from: MutationState,
        to: MutationState,
    },
}

/// Outstanding mutations in submission order.
#[derive(Debug, Default)]
pub struct MutationTracker {
    next_id: u64,
    outstanding: Vec<PendingMutation>,
}

impl MutationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly submitted mutation as `Queued`.
    pub fn submit(&mut self, mutation: CartMutation, now: Instant) -> MutationId {
        self.next_id += 1;
        let id = MutationId(self.next_id);
        tracing::debug!(%id, action = %mutation.kind(), "cart mutation queued");
        self.outstanding.push(PendingMutation {
            id,
            mutation,
            state: MutationState::Queued,
            submitted_at: now,
        });
        id
    }

    /// Moves a `Queued` mutation to `Submitting`.
    ///
    /// # Errors
    ///
    /// [`TrackerError::UnknownMutation`] if `id` is not outstanding;
    /// [`TrackerError::InvalidTransition`] if it is already submitting.
    pub fn mark_submitting(&mut self, id: MutationId) -> Result<(), TrackerError> {
        let record = self
            .outstanding
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TrackerError::UnknownMutation(id))?;
        if record.state != MutationState::Queued {
            return Err(TrackerError::InvalidTransition {
                id,
                from: record.state,
                to: MutationState::Submitting,
            });
        }
        record.state = MutationState::Submitting;
        Ok(())
    }

    /// Ends an outstanding mutation and returns its final record.
    ///
    /// # Errors
    ///
    /// [`TrackerError::UnknownMutation`] if `id` is not outstanding;
    /// [`TrackerError::InvalidTransition`] if `state` is not terminal.
    pub fn finish(
        &mut self,
        id: MutationId,
        state: MutationState,
    ) -> Result<PendingMutation, TrackerError> {
        let index = self
            .outstanding
            .iter()
            .position(|m| m.id == id)
            .ok_or(TrackerError::UnknownMutation(id))?;
        if state.is_outstanding() {
            return Err(TrackerError::InvalidTransition {
                id,
                from: self.outstanding[index].state,
                to: state,
            });
        }
        let mut record = self.outstanding.remove(index);
        record.state = state;
        Ok(record)
    }

    /// Fails every mutation outstanding for longer than `max_age` and returns
    /// the failed records.
    pub fn expire(&mut self, now: Instant, max_age: Duration) -> Vec<PendingMutation> {
        let (stale, fresh): (Vec<_>, Vec<_>) = std::mem::take(&mut self.outstanding)
            .into_iter()
            .partition(|m| now.saturating_duration_since(m.submitted_at) > max_age);
        self.outstanding = fresh;
        stale
            .into_iter()
            .map(|mut m| {
                tracing::warn!(id = %m.id, action = %m.mutation.kind(), "expiring stale cart mutation");
                m.state = MutationState::Failed;
                m
            })
            .collect()
    }

    /// Outstanding mutations, oldest first.
    #[must_use]
    pub fn outstanding(&self) -> &[PendingMutation] {
        &self.outstanding
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }
}
