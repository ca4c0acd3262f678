use std::cell::RefCell;
use std::collections::HashSet;

use tether_core::{Listener, Notification, WindowId};

/// Listener registrations made through [`HostWindow`](crate::HostWindow).
///
/// Win32 has no per-window listener API for WinEvents, so registration is
/// a set consulted by the event loop before anything is delivered.
/// Adding or removing twice is harmless.
#[derive(Debug, Default)]
pub struct Subscriptions {
    listeners: RefCell<HashSet<(WindowId, Listener)>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, window: WindowId, listener: Listener) {
        if self.listeners.borrow_mut().insert((window, listener)) {
            tracing::trace!(%window, ?listener, "subscribed");
        }
    }

    pub fn remove(&self, window: WindowId, listener: Listener) {
        if self.listeners.borrow_mut().remove(&(window, listener)) {
            tracing::trace!(%window, ?listener, "unsubscribed");
        }
    }

    pub fn contains(&self, window: WindowId, listener: Listener) -> bool {
        self.listeners.borrow().contains(&(window, listener))
    }

    /// True if any listener is registered for `window`.
    pub fn watches(&self, window: WindowId) -> bool {
        self.listeners.borrow().iter().any(|(w, _)| *w == window)
    }

    /// True if the notification's window has the matching listener.
    pub fn accepts(&self, notification: &Notification) -> bool {
        self.contains(notification.window, notification.event.listener())
    }
}
