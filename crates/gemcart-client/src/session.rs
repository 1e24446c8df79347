//! Cart session: the authoritative snapshot, outstanding mutations, and the
//! drawer, kept consistent with each other.

use std::time::{Duration, Instant};

use gemcart_core::{CartMutation, CartResponse, CartSnapshot, CartUserError};

use crate::drawer::{DrawerController, DrawerPanel};
use crate::pending::{MutationId, MutationState, MutationTracker, TrackerError};
use crate::projector::{project, ProjectedCart};

/// Outcome of observing a mutation's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub id: MutationId,
    pub state: MutationState,
    /// User errors reported by the platform, verbatim.
    pub errors: Vec<CartUserError>,
    /// The response's snapshot replaced the authoritative one. `false` when
    /// a newer mutation's snapshot had already been applied.
    pub snapshot_applied: bool,
    pub drawer_opened: bool,
}

#[derive(Debug)]
pub struct CartSession {
    snapshot: Option<CartSnapshot>,
    /// Newest mutation whose snapshot is the current one.
    applied_through: Option<MutationId>,
    tracker: MutationTracker,
    drawer: DrawerController,
}

impl CartSession {
    #[must_use]
    pub fn new(snapshot: Option<CartSnapshot>, drawer: DrawerController) -> Self {
        Self {
            snapshot,
            applied_through: None,
            tracker: MutationTracker::new(),
            drawer,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&CartSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn drawer(&self) -> &DrawerController {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut DrawerController {
        &mut self.drawer
    }

    /// Queues `mutation` and returns its id.
    pub fn submit(&mut self, mutation: CartMutation) -> MutationId {
        self.submit_at(mutation, Instant::now())
    }

    pub fn submit_at(&mut self, mutation: CartMutation, now: Instant) -> MutationId {
        self.tracker.submit(mutation, now)
    }

    /// # Errors
    ///
    /// See [`MutationTracker::mark_submitting`].
    pub fn mark_submitting(&mut self, id: MutationId) -> Result<(), TrackerError> {
        self.tracker.mark_submitting(id)
    }

    /// Applies the platform's response to mutation `id`.
    ///
    /// A response without user errors resolves the mutation; one with user
    /// errors fails it, dropping its optimistic contribution. Either way the
    /// returned cart is authoritative and replaces the snapshot, unless a
    /// newer mutation's snapshot was already applied. A successful
    /// line-changing mutation opens the cart drawer.
    ///
    /// # Errors
    ///
    /// [`TrackerError::UnknownMutation`] if `id` is not outstanding.
    pub fn resolve(
        &mut self,
        id: MutationId,
        response: CartResponse,
        now: Instant,
    ) -> Result<Resolution, TrackerError> {
        let state = if response.is_success() {
            MutationState::Resolved
        } else {
            MutationState::Failed
        };
        let record = self.tracker.finish(id, state)?;

        let mut snapshot_applied = false;
        if let Some(cart) = response.cart {
            if self.applied_through.is_some_and(|newest| newest > id) {
                tracing::debug!(%id, "ignoring snapshot older than the applied one");
            } else {
                self.snapshot = Some(cart);
                self.applied_through = Some(id);
                snapshot_applied = true;
            }
        }

        let drawer_opened = state == MutationState::Resolved
            && record.mutation.kind().changes_lines()
            && self.drawer.open_at(DrawerPanel::Cart, now);

        if !response.errors.is_empty() {
            tracing::info!(
                %id,
                action = %record.mutation.kind(),
                error_count = response.errors.len(),
                "cart mutation failed with user errors"
            );
        }

        Ok(Resolution {
            id,
            state,
            errors: response.errors,
            snapshot_applied,
            drawer_opened,
        })
    }

    /// Fails mutation `id` after a transport failure. The snapshot is kept.
    ///
    /// # Errors
    ///
    /// [`TrackerError::UnknownMutation`] if `id` is not outstanding.
    pub fn fail(&mut self, id: MutationId) -> Result<(), TrackerError> {
        let record = self.tracker.finish(id, MutationState::Failed)?;
        tracing::warn!(%id, action = %record.mutation.kind(), "cart mutation failed");
        Ok(())
    }

    /// Fails mutations outstanding longer than `max_age`. Never called
    /// implicitly.
    pub fn expire_stale(&mut self, now: Instant, max_age: Duration) -> Vec<MutationId> {
        self.tracker
            .expire(now, max_age)
            .into_iter()
            .map(|m| m.id)
            .collect()
    }

    /// Whether any mutation is queued or in flight.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        !self.tracker.is_empty()
    }

    /// The cart as it should currently be rendered.
    #[must_use]
    pub fn projected(&self) -> ProjectedCart {
        project(self.snapshot.as_ref(), self.tracker.outstanding())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
