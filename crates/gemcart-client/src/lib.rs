//! Client-side cart state: in-flight mutation tracking, the optimistic cart
//! projection derived from it, and the cart/search/mobile drawer.
//!
//! All state here has a single owner. Transitions take `&mut self`; nothing
//! is global and nothing is shared across threads except the scroll-lock
//! flag.

pub mod drawer;
pub mod pending;
pub mod projector;
pub mod session;

pub use drawer::{DrawerController, DrawerPanel, ScrollLock, ScrollLockGuard, CART_REOPEN_DEBOUNCE};
pub use pending::{MutationId, MutationState, MutationTracker, PendingMutation, TrackerError};
pub use projector::{project, ProjectedCart};
pub use session::{CartSession, Resolution};
