use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::*;
use crate::{ActivationEvent, GeometryEvent, Listener, Point, Size, WindowId, WindowResult};

const HOST: WindowId = WindowId(0x100);

// -- Fakes --

#[derive(Default)]
struct FakeOverlay {
    visible: Cell<bool>,
    bounds: Cell<Rect>,
}

impl OverlayWindow for FakeOverlay {
    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    fn set_size(&self, size: Size) {
        self.bounds.set(self.bounds.get().with_size(size));
    }

    fn set_location(&self, location: Point) {
        self.bounds.set(self.bounds.get().at(location));
    }
}

struct FakeWindow {
    id: WindowId,
    added: RefCell<HashMap<Listener, usize>>,
    removed: RefCell<HashMap<Listener, usize>>,
}

impl FakeWindow {
    fn new(id: WindowId) -> Rc<Self> {
        Rc::new(Self {
            id,
            added: RefCell::default(),
            removed: RefCell::default(),
        })
    }

    fn added(&self, listener: Listener) -> usize {
        self.added.borrow().get(&listener).copied().unwrap_or(0)
    }

    fn removed(&self, listener: Listener) -> usize {
        self.removed.borrow().get(&listener).copied().unwrap_or(0)
    }

    fn listening(&self, listener: Listener) -> bool {
        self.added(listener) == self.removed(listener) + 1
    }
}

impl AncestorWindow for FakeWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn add_listener(&self, listener: Listener) {
        *self.added.borrow_mut().entry(listener).or_default() += 1;
    }

    fn remove_listener(&self, listener: Listener) {
        *self.removed.borrow_mut().entry(listener).or_default() += 1;
    }
}

/// A throwaway handle to a `FakeWindow`, as platforms hand out a fresh
/// wrapper on every ancestor lookup.
struct ForwardingWindow(Rc<FakeWindow>);

impl AncestorWindow for ForwardingWindow {
    fn id(&self) -> WindowId {
        self.0.id
    }

    fn add_listener(&self, listener: Listener) {
        self.0.add_listener(listener);
    }

    fn remove_listener(&self, listener: Listener) {
        self.0.remove_listener(listener);
    }
}

struct FakeAnchor {
    bounds: Cell<Rect>,
    location: Cell<Point>,
    ancestor: RefCell<Option<Rc<FakeWindow>>>,
    broken: Cell<bool>,
    /// Hand out a new short-lived handle per lookup instead of the window.
    fresh_handles: Cell<bool>,
}

impl FakeAnchor {
    fn resize(&self, width: i32, height: i32) {
        self.bounds
            .set(self.bounds.get().with_size(Size::new(width, height)));
    }
}

impl AnchorSurface for FakeAnchor {
    fn bounds(&self) -> WindowResult<Rect> {
        if self.broken.get() {
            return Err("surface destroyed".into());
        }
        Ok(self.bounds.get())
    }

    fn location_on_screen(&self) -> WindowResult<Point> {
        if self.broken.get() {
            return Err("surface destroyed".into());
        }
        Ok(self.location.get())
    }

    fn ancestor_window(&self) -> Option<Rc<dyn AncestorWindow>> {
        let window = self.ancestor.borrow().clone()?;
        if self.fresh_handles.get() {
            return Some(Rc::new(ForwardingWindow(window)));
        }
        Some(window as Rc<dyn AncestorWindow>)
    }
}

struct Fixture {
    sync: OverlaySynchronizer,
    anchor: Rc<FakeAnchor>,
    window: Rc<FakeWindow>,
}

impl Fixture {
    fn new() -> Self {
        let window = FakeWindow::new(HOST);
        let anchor = Rc::new(FakeAnchor {
            bounds: Cell::new(Rect::new(10, 20, 300, 200)),
            location: Cell::new(Point::new(110, 220)),
            ancestor: RefCell::new(Some(window.clone())),
            broken: Cell::new(false),
            fresh_handles: Cell::new(false),
        });
        let sync = OverlaySynchronizer::new(VideoSurface::Component(anchor.clone()));
        Self {
            sync,
            anchor,
            window,
        }
    }

    /// Like [`Fixture::new`], but the anchor resolves its ancestor to a new
    /// handle on every lookup and nothing else keeps that handle alive.
    fn with_fresh_handles() -> Self {
        let f = Self::new();
        f.anchor.fresh_handles.set(true);
        f
    }

    /// Installs a fresh overlay. The caller keeps it alive, like an
    /// application would.
    fn install(&mut self) -> Rc<FakeOverlay> {
        let overlay = Rc::new(FakeOverlay::default());
        let handle: Rc<dyn OverlayWindow> = overlay.clone();
        self.sync
            .set_overlay(Some(&handle))
            .expect("component surface accepts overlays");
        overlay
    }

    fn geometry(&mut self, event: GeometryEvent) {
        self.sync.dispatch(&Notification::geometry(HOST, event));
    }

    fn activation(&mut self, event: ActivationEvent) {
        self.sync.dispatch(&Notification::activation(HOST, event));
    }

    /// Geometry listener registrations minus removals.
    fn geometry_balance(&self) -> usize {
        self.window.added(Listener::Geometry) - self.window.removed(Listener::Geometry)
    }
}

// -- Public contract --

#[test]
fn new_overlay_is_not_enabled_automatically() {
    // Arrange
    let mut f = Fixture::new();

    // Act
    let overlay = f.install();

    // Assert
    assert!(!overlay.is_visible());
    assert!(!f.sync.overlay_enabled());
    assert!(f.sync.overlay().is_some());
}

#[test]
fn overlay_enabled_reflects_last_request() {
    // Arrange
    let mut f = Fixture::new();
    let _overlay = f.install();

    // Act / Assert
    for enable in [true, false, false, true, true, false, true] {
        f.sync.enable_overlay(enable);
        assert_eq!(f.sync.overlay_enabled(), enable);
    }
}

#[test]
fn enable_twice_matches_enable_once() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();

    // Act
    f.sync.enable_overlay(true);
    f.sync.enable_overlay(true);

    // Assert
    assert!(overlay.is_visible());
    assert_eq!(f.window.added(Listener::Geometry), 1);
    assert_eq!(overlay.bounds.get(), Rect::new(110, 220, 300, 200));
}

#[test]
fn enable_without_overlay_does_nothing() {
    let mut f = Fixture::new();

    f.sync.enable_overlay(true);

    assert!(!f.sync.overlay_enabled());
    assert_eq!(f.window.added(Listener::Geometry), 0);
}

fn assert_geometry_follows_visibility(f: &mut Fixture) {
    let _overlay = f.install();
    for enable in [true, true, false, true, false, false, true] {
        f.sync.enable_overlay(enable);
        assert!(f.geometry_balance() <= 1);
        assert_eq!(f.geometry_balance() == 1, f.sync.overlay_enabled());
    }
}

#[test]
fn geometry_listener_tracks_visibility() {
    assert_geometry_follows_visibility(&mut Fixture::new());
}

#[test]
fn geometry_listener_tracks_visibility_with_short_lived_handles() {
    assert_geometry_follows_visibility(&mut Fixture::with_fresh_handles());
}

#[test]
fn short_lived_handles_are_unregistered_on_teardown() {
    // Arrange
    let mut f = Fixture::with_fresh_handles();
    let _overlay = f.install();

    // Act
    f.sync.enable_overlay(true);
    f.sync.enable_overlay(false);
    f.sync.enable_overlay(true);
    f.sync.release();

    // Assert
    assert_eq!(f.window.added(Listener::Geometry), 2);
    assert_eq!(f.window.removed(Listener::Geometry), 2);
    assert_eq!(f.window.added(Listener::Activation), 1);
    assert_eq!(f.window.removed(Listener::Activation), 1);
}

#[test]
fn replacing_overlay_with_short_lived_handles_keeps_one_activation_listener() {
    // Arrange
    let mut f = Fixture::with_fresh_handles();
    let _first = f.install();

    // Act
    let _second = f.install();

    // Assert
    assert!(f.window.listening(Listener::Activation));
    assert_eq!(f.window.removed(Listener::Activation), 1);
}

#[test]
fn activation_listener_tracks_installation() {
    // Arrange
    let mut f = Fixture::new();
    assert!(!f.window.listening(Listener::Activation));

    // Act
    let _overlay = f.install();
    let installed = f.window.listening(Listener::Activation);
    f.sync.set_overlay(None).unwrap();

    // Assert
    assert!(installed);
    assert!(!f.window.listening(Listener::Activation));
    assert!(f.sync.overlay().is_none());
}

#[test]
fn enable_places_overlay_at_anchor_screen_bounds() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();

    // Act
    f.sync.enable_overlay(true);

    // Assert
    assert_eq!(overlay.bounds.get(), Rect::new(110, 220, 300, 200));
    assert_eq!(f.sync.overlay_bounds(), Rect::new(110, 220, 300, 200));
}

// -- Geometry tracking --

#[test]
fn anchor_resize_applies_only_while_visible() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.anchor.resize(400, 250);
    f.geometry(GeometryEvent::Resized);
    let resized = overlay.bounds.get();

    f.sync.enable_overlay(false);
    f.anchor.resize(640, 480);
    f.geometry(GeometryEvent::Resized);

    // Assert
    assert_eq!(resized, Rect::new(110, 220, 400, 250));
    assert_eq!(overlay.bounds.get(), Rect::new(110, 220, 400, 250));
}

#[test]
fn anchor_move_repositions_overlay() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.anchor.location.set(Point::new(500, 40));
    f.geometry(GeometryEvent::Moved);

    // Assert
    assert_eq!(overlay.bounds.get(), Rect::new(500, 40, 300, 200));
    assert_eq!(f.sync.overlay_bounds(), Rect::new(500, 40, 300, 200));
}

#[test]
fn anchor_hide_and_show_round_trip() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.geometry(GeometryEvent::Hidden);
    let hidden = !overlay.is_visible();
    // The geometry listener is gone while hidden, so the host's "shown"
    // arrives through activation once the window comes back.
    f.activation(ActivationEvent::Activated);

    // Assert
    assert!(hidden);
    assert!(overlay.is_visible());
}

#[test]
fn echoed_shown_notification_is_harmless() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.geometry(GeometryEvent::Shown);

    // Assert
    assert!(overlay.is_visible());
    assert_eq!(f.window.added(Listener::Geometry), 1);
}

#[test]
fn notifications_for_other_windows_are_ignored() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.sync.dispatch(&Notification::activation(
        WindowId(0x999),
        ActivationEvent::Deactivated,
    ));

    // Assert
    assert!(overlay.is_visible());
}

// -- Restore / suspend --

#[test]
fn deactivate_then_activate_restores_overlay() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.activation(ActivationEvent::Deactivated);
    let suspended = !overlay.is_visible();
    f.activation(ActivationEvent::Activated);

    // Assert
    assert!(suspended);
    assert!(overlay.is_visible());
    assert_eq!(f.geometry_balance(), 1);
}

#[test]
fn deactivate_without_request_does_not_restore() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(false);

    // Act
    f.activation(ActivationEvent::Deactivated);
    f.activation(ActivationEvent::Activated);

    // Assert
    assert!(!overlay.is_visible());
}

#[test]
fn repeated_deactivation_keeps_restore_pending() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.activation(ActivationEvent::Deactivated);
    f.activation(ActivationEvent::Deactivated);
    f.activation(ActivationEvent::Activated);

    // Assert
    assert!(overlay.is_visible());
}

#[test]
fn disable_while_suspended_cancels_restore() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);
    f.activation(ActivationEvent::Deactivated);

    // Act
    f.sync.enable_overlay(false);
    f.activation(ActivationEvent::Activated);

    // Assert
    assert!(!overlay.is_visible());
}

#[test]
fn minimize_is_handled_by_deactivation() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act / Assert
    f.activation(ActivationEvent::Iconified);
    assert!(overlay.is_visible());

    f.activation(ActivationEvent::Deactivated);
    assert!(!overlay.is_visible());

    f.activation(ActivationEvent::Deiconified);
    assert!(overlay.is_visible());
}

#[test]
fn restore_uses_current_anchor_geometry() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);
    f.activation(ActivationEvent::Deactivated);

    // Act
    f.anchor.location.set(Point::new(0, 0));
    f.anchor.resize(800, 600);
    f.activation(ActivationEvent::Activated);

    // Assert
    assert_eq!(overlay.bounds.get(), Rect::new(0, 0, 800, 600));
}

// -- Replacement and teardown --

#[test]
fn replacing_overlay_disables_and_detaches_previous() {
    // Arrange
    let mut f = Fixture::new();
    let first = f.install();
    f.sync.enable_overlay(true);

    // Act
    let second = f.install();

    // Assert
    assert!(!first.is_visible());
    assert!(!second.is_visible());
    assert_eq!(f.geometry_balance(), 0);
    assert_eq!(f.window.added(Listener::Activation), 2);
    assert_eq!(f.window.removed(Listener::Activation), 1);

    // The old overlay no longer reacts to anything.
    f.activation(ActivationEvent::Activated);
    assert!(!first.is_visible());
    assert!(!second.is_visible());
}

#[test]
fn release_hides_without_dropping_overlay() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.sync.release();

    // Assert
    assert!(!overlay.is_visible());
    assert!(f.sync.overlay().is_none());
    assert_eq!(Rc::strong_count(&overlay), 1);
    assert!(!f.window.listening(Listener::Geometry));
    assert!(!f.window.listening(Listener::Activation));
}

#[test]
fn dropping_synchronizer_detaches_everything() {
    // Arrange
    let Fixture {
        mut sync, window, ..
    } = Fixture::new();
    let overlay = Rc::new(FakeOverlay::default());
    let handle: Rc<dyn OverlayWindow> = overlay.clone();
    sync.set_overlay(Some(&handle)).unwrap();
    sync.enable_overlay(true);

    // Act
    drop(sync);

    // Assert
    assert!(!overlay.is_visible());
    assert!(!window.listening(Listener::Geometry));
    assert!(!window.listening(Listener::Activation));
}

#[test]
fn overlay_dropped_by_application_is_uninstalled() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    drop(overlay);

    // Act
    f.sync.enable_overlay(true);

    // Assert
    assert!(f.sync.overlay().is_none());
    assert!(!f.sync.overlay_enabled());
    assert!(!f.window.listening(Listener::Activation));
}

// -- Failures --

#[test]
fn callback_surface_rejects_overlay_and_keeps_previous() {
    // Arrange
    let mut f = Fixture::new();
    let first = f.install();
    f.sync.set_video_surface(VideoSurface::Callback);
    let second: Rc<dyn OverlayWindow> = Rc::new(FakeOverlay::default());

    // Act
    let result = f.sync.set_overlay(Some(&second));

    // Assert
    assert_eq!(result, Err(OverlayError::UnsupportedSurface));
    let installed = f.sync.overlay().expect("previous overlay kept");
    assert!(Rc::ptr_eq(
        &installed,
        &(first.clone() as Rc<dyn OverlayWindow>)
    ));
}

#[test]
fn switching_back_to_component_surface_reshows_overlay() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.sync.set_video_surface(VideoSurface::Callback);
    let hidden = !overlay.is_visible();
    let dormant = f.sync.overlay().is_some() && !f.window.listening(Listener::Activation);
    f.sync
        .set_video_surface(VideoSurface::Component(f.anchor.clone()));

    // Assert
    assert!(hidden);
    assert!(dormant);
    assert!(overlay.is_visible());
    assert!(f.window.listening(Listener::Activation));
    assert_eq!(f.geometry_balance(), 1);
}

#[test]
fn unavailable_anchor_geometry_leaves_overlay_hidden() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.anchor.broken.set(true);

    // Act
    f.sync.enable_overlay(true);

    // Assert
    assert!(!overlay.is_visible());
    assert_eq!(f.geometry_balance(), 0);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "no ancestor window")]
fn missing_ancestor_window_is_a_logic_error() {
    // Arrange
    let mut f = Fixture::new();
    f.anchor.ancestor.replace(None);
    let overlay: Rc<dyn OverlayWindow> = Rc::new(FakeOverlay::default());

    // Act
    let _ = f.sync.set_overlay(Some(&overlay));
}

#[test]
fn set_overlay_none_uninstalls() {
    // Arrange
    let mut f = Fixture::new();
    let overlay = f.install();
    f.sync.enable_overlay(true);

    // Act
    f.sync
        .set_overlay(None)
        .expect("component surface accepts uninstall");

    // Assert
    assert!(!overlay.is_visible());
    assert!(f.sync.overlay().is_none());
    assert!(!f.sync.overlay_enabled());
    assert!(!f.window.listening(Listener::Activation));
    assert_eq!(f.geometry_balance(), 0);
}
