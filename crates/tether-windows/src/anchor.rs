use std::rc::Rc;

use tether_core::{AnchorSurface, AncestorWindow, Point, Rect, WindowResult};

use crate::{HostWindow, Subscriptions, Window};

/// The window video is rendered into, used as the overlay's anchor.
///
/// Usually a child control of the player window, but a top-level window
/// works too; it is then its own ancestor.
pub struct ChildSurface {
    window: Window,
    subscriptions: Rc<Subscriptions>,
}

impl ChildSurface {
    pub fn new(window: Window, subscriptions: Rc<Subscriptions>) -> Self {
        Self {
            window,
            subscriptions,
        }
    }
}

impl AnchorSurface for ChildSurface {
    /// Client area relative to the top-level window's client area.
    fn bounds(&self) -> WindowResult<Rect> {
        let client = self.window.client_rect()?;
        let root = self
            .window
            .root()
            .ok_or_else(|| format!("{} has no top-level window", self.window.id()))?;
        let origin = root.client_origin()?;
        Ok(Rect::new(
            client.x - origin.x,
            client.y - origin.y,
            client.width,
            client.height,
        ))
    }

    fn location_on_screen(&self) -> WindowResult<Point> {
        self.window.client_origin()
    }

    fn ancestor_window(&self) -> Option<Rc<dyn AncestorWindow>> {
        let root = self.window.root()?;
        let host: Rc<dyn AncestorWindow> =
            Rc::new(HostWindow::new(root, self.subscriptions.clone()));
        Some(host)
    }
}
