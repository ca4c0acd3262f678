use std::fmt;

use crate::Listener;

/// Opaque identifier of a native window (an `HWND` value on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub usize);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Geometry and visibility changes of the window hosting the anchor surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryEvent {
    /// The window changed size.
    Resized,
    /// The window changed position.
    Moved,
    /// The window became visible.
    Shown,
    /// The window was hidden.
    Hidden,
}

/// Activation state changes of the ancestor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationEvent {
    /// The window became the foreground window.
    Activated,
    /// The window lost foreground status.
    Deactivated,
    /// The window was minimized.
    Iconified,
    /// The window was restored from minimized state.
    Deiconified,
}

/// Either kind of notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Geometry(GeometryEvent),
    Activation(ActivationEvent),
}

impl Event {
    /// The listener registration this event is delivered through.
    pub fn listener(&self) -> Listener {
        match self {
            Self::Geometry(_) => Listener::Geometry,
            Self::Activation(_) => Listener::Activation,
        }
    }
}

/// A platform-agnostic notification about one window.
///
/// Platform crates translate raw OS events into these and hand them to
/// [`OverlaySynchronizer::dispatch`](crate::OverlaySynchronizer::dispatch)
/// on the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub window: WindowId,
    pub event: Event,
}

impl Notification {
    pub fn geometry(window: WindowId, event: GeometryEvent) -> Self {
        Self {
            window,
            event: Event::Geometry(event),
        }
    }

    pub fn activation(window: WindowId, event: ActivationEvent) -> Self {
        Self {
            window,
            event: Event::Activation(event),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.event {
            Event::Geometry(GeometryEvent::Resized) => "resized",
            Event::Geometry(GeometryEvent::Moved) => "moved",
            Event::Geometry(GeometryEvent::Shown) => "shown",
            Event::Geometry(GeometryEvent::Hidden) => "hidden",
            Event::Activation(ActivationEvent::Activated) => "activated",
            Event::Activation(ActivationEvent::Deactivated) => "deactivated",
            Event::Activation(ActivationEvent::Iconified) => "iconified",
            Event::Activation(ActivationEvent::Deiconified) => "deiconified",
        };
        write!(f, "{:<12} {}", name, self.window)
    }
}
