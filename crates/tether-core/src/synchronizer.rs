//! Keeps an overlay window glued to the video surface.
//!
//! The synchronizer owns two booleans: what the application asked for
//! (`requested`) and whether the overlay was hidden only because the host
//! window lost focus or was minimized (`restore_pending`). Keeping them apart
//! lets the overlay disappear with its host and come back on its own.
//!
//! Everything runs on the UI thread. Notifications are fed in through
//! [`OverlaySynchronizer::dispatch`]; every transition checks the overlay's
//! current visibility first, so a notification raised by the synchronizer's
//! own show/hide is harmless when it comes back around.

use std::rc::{Rc, Weak};

use crate::tracker::{ActivationObserver, ActivationTracker, GeometryObserver, GeometryTracker};
use crate::{
    AnchorSurface, AncestorWindow, Event, Notification, OverlayError, OverlayWindow, Rect,
    VideoSurface,
};

/// Synchronizes an application-owned overlay window with the anchor surface.
///
/// Tracker invariants:
/// - the geometry tracker is attached iff the overlay is visible;
/// - the activation tracker is attached iff an overlay is installed,
///   except while the video surface is [`VideoSurface::Callback`]: the
///   overlay then stays installed but dormant, with no window to listen
///   on, until [`set_video_surface`](Self::set_video_surface) brings back
///   a component surface.
pub struct OverlaySynchronizer {
    surface: VideoSurface,
    overlay: Option<Weak<dyn OverlayWindow>>,
    requested: bool,
    restore_pending: bool,
    bounds: Rect,
    geometry: GeometryTracker,
    activation: ActivationTracker,
}

impl OverlaySynchronizer {
    pub fn new(surface: VideoSurface) -> Self {
        Self {
            surface,
            overlay: None,
            requested: false,
            restore_pending: false,
            bounds: Rect::default(),
            geometry: GeometryTracker::new(),
            activation: ActivationTracker::new(),
        }
    }

    /// Switches to a different video surface.
    ///
    /// An installed overlay stays installed. It is hidden and its listeners
    /// move to the new surface's window; if the application still wants it
    /// shown it reappears over the new anchor. A callback surface has no
    /// window, so the overlay stays hidden until a component surface returns.
    pub fn set_video_surface(&mut self, surface: VideoSurface) {
        self.apply(false);
        self.activation.detach();
        tracing::debug!(?surface, "video surface changed");
        self.surface = surface;

        if self.overlay.is_none() {
            return;
        }
        let Some(anchor) = self.anchor() else {
            return;
        };
        if let Some(ancestor) = resolve_ancestor(&*anchor) {
            self.activation.attach(&ancestor);
            if self.requested {
                self.apply(true);
            }
        }
    }

    /// Returns the installed overlay, if the application still holds it.
    pub fn overlay(&self) -> Option<Rc<dyn OverlayWindow>> {
        self.overlay.as_ref().and_then(Weak::upgrade)
    }

    /// Installs a new overlay, replacing the current one.
    ///
    /// The previous overlay is hidden and detached but never disposed;
    /// that stays with the application. The new overlay is not shown
    /// until [`enable_overlay`](Self::enable_overlay) is called. Passing
    /// `None` only uninstalls.
    ///
    /// # Errors
    ///
    /// [`OverlayError::UnsupportedSurface`] if the video surface is not
    /// component-backed, and [`OverlayError::NoAncestorWindow`] if the
    /// anchor is not inside a window yet. Neither changes any state.
    pub fn set_overlay(
        &mut self,
        overlay: Option<&Rc<dyn OverlayWindow>>,
    ) -> Result<(), OverlayError> {
        let anchor = self.anchor().ok_or(OverlayError::UnsupportedSurface)?;
        let ancestor = match overlay {
            Some(_) => Some(resolve_ancestor(&*anchor).ok_or(OverlayError::NoAncestorWindow)?),
            None => None,
        };

        self.enable_overlay(false);
        self.remove_overlay();
        if let (Some(overlay), Some(ancestor)) = (overlay, ancestor) {
            self.overlay = Some(Rc::downgrade(overlay));
            self.activation.attach(&ancestor);
            tracing::info!(window = %ancestor.id(), "overlay installed");
        }
        Ok(())
    }

    /// Shows or hides the overlay and records the request.
    ///
    /// Showing places the overlay over the anchor's current screen bounds
    /// before making it visible. Calls that would not change visibility
    /// only update the request. Disabling also cancels a pending restore,
    /// so a suspended overlay stays hidden once the host comes back.
    pub fn enable_overlay(&mut self, enable: bool) {
        self.requested = enable;
        if !enable {
            self.restore_pending = false;
        }
        self.apply(enable);
    }

    /// True iff an overlay is installed and currently visible.
    pub fn overlay_enabled(&self) -> bool {
        self.overlay().is_some_and(|o| o.is_visible())
    }

    /// The geometry most recently applied to the overlay.
    pub fn overlay_bounds(&self) -> Rect {
        self.bounds
    }

    /// Routes a host notification to the tracker registered for it.
    ///
    /// Notifications for windows no tracker is attached to are dropped.
    pub fn dispatch(&mut self, notification: &Notification) {
        match notification.event {
            Event::Geometry(event) if self.geometry.is_attached_to(notification.window) => {
                GeometryTracker::relay(event, self);
            }
            Event::Activation(event) if self.activation.is_attached_to(notification.window) => {
                ActivationTracker::relay(event, self);
            }
            _ => tracing::trace!(%notification, "notification ignored"),
        }
    }

    /// Disables and uninstalls the overlay without disposing it.
    pub fn release(&mut self) {
        self.enable_overlay(false);
        self.remove_overlay();
    }

    fn anchor(&self) -> Option<Rc<dyn AnchorSurface>> {
        self.surface.anchor().cloned()
    }

    /// Changes the overlay's visibility without touching the request.
    fn apply(&mut self, visible: bool) {
        let Some(overlay) = self.live_overlay() else {
            return;
        };

        if visible {
            if !overlay.is_visible() {
                self.show(&*overlay);
            }
        } else if overlay.is_visible() {
            overlay.set_visible(false);
            self.geometry.detach();
            tracing::debug!("overlay hidden");
        }
    }

    fn show(&mut self, overlay: &dyn OverlayWindow) {
        let Some(anchor) = self.anchor() else {
            return;
        };
        let Some(ancestor) = resolve_ancestor(&*anchor) else {
            return;
        };
        let bounds = match screen_bounds(&*anchor) {
            Ok(bounds) => bounds,
            Err(e) => {
                tracing::warn!("cannot show overlay, anchor geometry unavailable: {e}");
                return;
            }
        };

        self.bounds = bounds;
        overlay.set_bounds(bounds);
        self.geometry.attach(&ancestor);
        overlay.set_visible(true);
        tracing::debug!(?bounds, "overlay shown");
    }

    fn remove_overlay(&mut self) {
        if self.overlay.take().is_some() {
            self.activation.detach();
            tracing::info!("overlay removed");
        }
    }

    /// Upgrades the overlay reference, uninstalling it if the application
    /// has already dropped it.
    fn live_overlay(&mut self) -> Option<Rc<dyn OverlayWindow>> {
        let weak = self.overlay.as_ref()?;
        if let Some(overlay) = weak.upgrade() {
            return Some(overlay);
        }
        tracing::warn!("overlay was dropped while installed, uninstalling");
        self.overlay = None;
        self.geometry.detach();
        self.activation.detach();
        None
    }

    /// Returns the overlay only while it is on screen.
    fn visible_overlay(&mut self) -> Option<Rc<dyn OverlayWindow>> {
        self.live_overlay().filter(|o| o.is_visible())
    }

    /// Re-shows an overlay suspended by [`suspend`](Self::suspend).
    ///
    /// `restore_pending` is left set; the next suspend re-derives it.
    fn restore(&mut self) {
        if self.restore_pending {
            self.apply(true);
        }
    }

    /// Hides the overlay while remembering whether it should come back.
    fn suspend(&mut self) {
        if self.requested {
            self.restore_pending = true;
            self.apply(false);
        } else {
            self.restore_pending = false;
        }
    }
}

impl GeometryObserver for OverlaySynchronizer {
    fn anchor_resized(&mut self) {
        let Some(overlay) = self.visible_overlay() else {
            return;
        };
        let Some(anchor) = self.anchor() else {
            return;
        };
        match anchor.bounds() {
            Ok(rect) => {
                self.bounds = self.bounds.with_size(rect.size());
                overlay.set_size(rect.size());
            }
            Err(e) => tracing::warn!("cannot resize overlay: {e}"),
        }
    }

    fn anchor_moved(&mut self) {
        let Some(overlay) = self.visible_overlay() else {
            return;
        };
        let Some(anchor) = self.anchor() else {
            return;
        };
        match anchor.location_on_screen() {
            Ok(location) => {
                self.bounds = self.bounds.at(location);
                overlay.set_location(location);
            }
            Err(e) => tracing::warn!("cannot move overlay: {e}"),
        }
    }

    fn anchor_shown(&mut self) {
        self.restore();
    }

    fn anchor_hidden(&mut self) {
        self.suspend();
    }
}

impl ActivationObserver for OverlaySynchronizer {
    fn host_activated(&mut self) {
        self.restore();
    }

    fn host_deactivated(&mut self) {
        self.suspend();
    }

    fn host_iconified(&mut self) {
        // Minimizing also deactivates the window; that notification suspends.
    }

    fn host_deiconified(&mut self) {
        self.restore();
    }
}

impl Drop for OverlaySynchronizer {
    fn drop(&mut self) {
        self.release();
    }
}

/// Anchor bounds translated to absolute screen coordinates.
fn screen_bounds(anchor: &dyn AnchorSurface) -> crate::WindowResult<Rect> {
    let bounds = anchor.bounds()?;
    Ok(bounds.at(anchor.location_on_screen()?))
}

/// Looks up the anchor's top-level window.
///
/// A missing ancestor means the surface was used before being placed in a
/// window hierarchy. That is an integration bug: it fails loudly in debug
/// builds and is logged and skipped in release builds.
fn resolve_ancestor(anchor: &dyn AnchorSurface) -> Option<Rc<dyn AncestorWindow>> {
    let ancestor = anchor.ancestor_window();
    if ancestor.is_none() {
        tracing::error!("anchor surface has no ancestor window");
        debug_assert!(false, "anchor surface has no ancestor window");
    }
    ancestor
}

#[cfg(test)]
mod tests;
