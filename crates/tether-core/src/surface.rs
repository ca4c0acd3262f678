//! Capabilities the engine consumes from the host toolkit.
//!
//! The engine never owns any of these. Overlay windows belong to the
//! application, ancestor windows to the toolkit; the engine holds weak
//! references and only stops talking to them when they are replaced.

use std::rc::Rc;

use crate::{Point, Rect, Size, WindowId, WindowResult};

/// An independently owned window that is kept on top of the anchor surface.
///
/// Setters are infallible: a failing native call leaves the window where it
/// was, and the next geometry notification corrects it.
///
/// Implementations must not call back into the synchronizer while one of
/// these methods runs. Notifications raised as a side effect (a "shown"
/// event after `set_visible(true)`, for instance) are queued by the host
/// event loop and dispatched afterwards.
pub trait OverlayWindow {
    fn is_visible(&self) -> bool;

    fn set_visible(&self, visible: bool);

    /// Moves and resizes the window in one step, in screen coordinates.
    fn set_bounds(&self, bounds: Rect);

    fn set_size(&self, size: Size);

    /// Moves the window's top-left corner to `location` on screen.
    fn set_location(&self, location: Point);
}

/// The rendering region whose geometry the overlay tracks.
pub trait AnchorSurface {
    /// Current bounds relative to the containing window.
    fn bounds(&self) -> WindowResult<Rect>;

    /// Absolute screen position of the surface's top-left corner.
    fn location_on_screen(&self) -> WindowResult<Point>;

    /// The top-level window currently containing the surface.
    ///
    /// Resolved on every call because the surface may be reparented.
    fn ancestor_window(&self) -> Option<Rc<dyn AncestorWindow>>;
}

/// Which tracker a listener registration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// Resize/move/show/hide notifications.
    Geometry,
    /// Activate/deactivate/iconify/deiconify notifications.
    Activation,
}

/// The top-level window that contains the anchor surface.
pub trait AncestorWindow {
    fn id(&self) -> WindowId;

    /// Starts delivering notifications of the given kind for this window.
    fn add_listener(&self, listener: Listener);

    /// Stops delivering notifications of the given kind.
    ///
    /// Must be safe to call when no such listener is registered.
    fn remove_listener(&self, listener: Listener);
}

/// The kind of surface video is currently rendered into.
#[derive(Clone)]
pub enum VideoSurface {
    /// Rendered into an on-screen component that overlays can track.
    Component(Rc<dyn AnchorSurface>),
    /// Rendered off-screen through frame callbacks; has no screen geometry.
    Callback,
}

impl VideoSurface {
    /// The anchor surface, if this kind supports overlays.
    pub fn anchor(&self) -> Option<&Rc<dyn AnchorSurface>> {
        match self {
            Self::Component(anchor) => Some(anchor),
            Self::Callback => None,
        }
    }
}

impl std::fmt::Debug for VideoSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component(_) => f.write_str("Component"),
            Self::Callback => f.write_str("Callback"),
        }
    }
}
