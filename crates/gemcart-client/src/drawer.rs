//! Aside drawer state machine: cart, search, and mobile menu panels.
//!
//! The cart panel cannot be re-opened for [`CART_REOPEN_DEBOUNCE`] after it
//! was closed, so a late "added to cart" response does not pop the drawer
//! back open under a shopper who just dismissed it. Other panels are never
//! debounced.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const CART_REOPEN_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawerPanel {
    #[default]
    Closed,
    Cart,
    Search,
    Mobile,
}

impl DrawerPanel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Cart => "cart",
            Self::Search => "search",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for DrawerPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawerPanel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(Self::Closed),
            "cart" => Ok(Self::Cart),
            "search" => Ok(Self::Search),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("unknown drawer panel: {other}")),
        }
    }
}

/// Page-level scroll lock shared between the drawer and the page shell.
///
/// Locked exactly while some [`ScrollLockGuard`] is alive. Clones share the
/// same guard count, so several drawers may hold the lock at once.
#[derive(Debug, Clone, Default)]
pub struct ScrollLock(Arc<AtomicUsize>);

impl ScrollLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.0.load(Ordering::Acquire) > 0
    }

    fn acquire(&self) -> ScrollLockGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        ScrollLockGuard(Arc::clone(&self.0))
    }
}

/// Releases the scroll lock when dropped.
#[derive(Debug)]
pub struct ScrollLockGuard(Arc<AtomicUsize>);

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Owns the drawer state. One instance per page session.
#[derive(Debug)]
pub struct DrawerController {
    panel: DrawerPanel,
    last_cart_close: Option<Instant>,
    scroll_lock: ScrollLock,
    guard: Option<ScrollLockGuard>,
}

impl DrawerController {
    #[must_use]
    pub fn new(scroll_lock: ScrollLock) -> Self {
        Self {
            panel: DrawerPanel::Closed,
            last_cart_close: None,
            scroll_lock,
            guard: None,
        }
    }

    #[must_use]
    pub fn panel(&self) -> DrawerPanel {
        self.panel
    }

    #[must_use]
    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.scroll_lock
    }

    /// Opens `target` now. See [`DrawerController::open_at`].
    pub fn open(&mut self, target: DrawerPanel) -> bool {
        self.open_at(target, Instant::now())
    }

    /// Opens `target` as of `now`. Returns `false` when a cart open was
    /// suppressed by the re-open debounce. Opening `Closed` closes.
    pub fn open_at(&mut self, target: DrawerPanel, now: Instant) -> bool {
        if target == DrawerPanel::Closed {
            self.close_at(now);
            return true;
        }

        if target == DrawerPanel::Cart {
            if let Some(closed_at) = self.last_cart_close {
                let since = now.saturating_duration_since(closed_at);
                if since < CART_REOPEN_DEBOUNCE {
                    tracing::debug!(
                        since_ms = since.as_millis(),
                        "cart drawer re-open suppressed"
                    );
                    return false;
                }
            }
        }

        tracing::debug!(from = %self.panel, to = %target, "drawer transition");
        self.panel = target;
        if self.guard.is_none() {
            self.guard = Some(self.scroll_lock.acquire());
        }
        true
    }

    /// Closes the drawer now. See [`DrawerController::close_at`].
    pub fn close(&mut self) {
        self.close_at(Instant::now());
    }

    /// Closes the drawer as of `now`, starting the cart re-open debounce if
    /// the cart panel was showing.
    pub fn close_at(&mut self, now: Instant) {
        if self.panel == DrawerPanel::Cart {
            self.last_cart_close = Some(now);
        }
        if self.panel != DrawerPanel::Closed {
            tracing::debug!(from = %self.panel, "drawer closed");
        }
        self.panel = DrawerPanel::Closed;
        self.guard = None;
    }

    /// Resets to `Closed` on page navigation and releases the scroll lock.
    /// Navigation is not a dismissal, so no debounce starts.
    pub fn navigate(&mut self) {
        self.panel = DrawerPanel::Closed;
        self.guard = None;
    }
}

impl Default for DrawerController {
    fn default() -> Self {
        Self::new(ScrollLock::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_closed_and_unlocked() {
        let drawer = DrawerController::default();
        assert_eq!(drawer.panel(), DrawerPanel::Closed);
        assert!(!drawer.scroll_lock().is_locked());
    }

    #[test]
    fn cart_reopen_within_debounce_is_suppressed() {
        let t0 = Instant::now();
        let mut drawer = DrawerController::default();
        assert!(drawer.open_at(DrawerPanel::Cart, t0));
        drawer.close_at(t0);

        assert!(!drawer.open_at(DrawerPanel::Cart, t0 + ms(999)));
        assert_eq!(drawer.panel(), DrawerPanel::Closed);

        assert!(drawer.open_at(DrawerPanel::Cart, t0 + ms(1000)));
        assert_eq!(drawer.panel(), DrawerPanel::Cart);
    }

    #[test]
    fn search_is_never_debounced() {
        let t0 = Instant::now();
        let mut drawer = DrawerController::default();
        drawer.open_at(DrawerPanel::Cart, t0);
        drawer.close_at(t0);

        assert!(drawer.open_at(DrawerPanel::Search, t0));
        assert_eq!(drawer.panel(), DrawerPanel::Search);
        assert!(drawer.open_at(DrawerPanel::Mobile, t0 + ms(1)));
        assert_eq!(drawer.panel(), DrawerPanel::Mobile);
    }

    #[test]
    fn closing_another_panel_does_not_debounce_cart() {
        let t0 = Instant::now();
        let mut drawer = DrawerController::default();
        drawer.open_at(DrawerPanel::Search, t0);
        drawer.close_at(t0);
        assert!(drawer.open_at(DrawerPanel::Cart, t0 + ms(1)));
    }

    #[test]
    fn open_closed_acts_as_close() {
        let t0 = Instant::now();
        let mut drawer = DrawerController::default();
        drawer.open_at(DrawerPanel::Cart, t0);
        drawer.open_at(DrawerPanel::Closed, t0);
        assert_eq!(drawer.panel(), DrawerPanel::Closed);
        assert!(!drawer.open_at(DrawerPanel::Cart, t0 + ms(10)));
    }

    #[test]
    fn scroll_lock_follows_open_state() {
        let lock = ScrollLock::new();
        let mut drawer = DrawerController::new(lock.clone());

        drawer.open(DrawerPanel::Mobile);
        assert!(lock.is_locked());
        drawer.open(DrawerPanel::Search);
        assert!(lock.is_locked());
        drawer.close();
        assert!(!lock.is_locked());

        drawer.open(DrawerPanel::Search);
        drawer.navigate();
        assert!(!lock.is_locked());
        assert_eq!(drawer.panel(), DrawerPanel::Closed);

        drawer.open(DrawerPanel::Search);
        drop(drawer);
        assert!(!lock.is_locked());
    }

    #[test]
    fn shared_lock_stays_held_while_any_drawer_is_open() {
        let lock = ScrollLock::new();
        let mut cart = DrawerController::new(lock.clone());
        let mut menu = DrawerController::new(lock.clone());

        cart.open(DrawerPanel::Cart);
        menu.open(DrawerPanel::Search);
        cart.close();
        assert!(lock.is_locked());

        menu.navigate();
        assert!(!lock.is_locked());
    }

    #[test]
    fn navigation_does_not_start_debounce() {
        let t0 = Instant::now();
        let mut drawer = DrawerController::default();
        drawer.open_at(DrawerPanel::Cart, t0);
        drawer.navigate();
        assert!(drawer.open_at(DrawerPanel::Cart, t0 + ms(1)));
    }

    #[test]
    fn panel_names_parse() {
        assert_eq!("cart".parse::<DrawerPanel>(), Ok(DrawerPanel::Cart));
        assert!("sidebar".parse::<DrawerPanel>().is_err());
    }
}
