//! Listener registrations that relay ancestor-window notifications.
//!
//! Each tracker is a registration of one [`Listener`] kind on one ancestor
//! window plus a fixed mapping from notification to observer callback.
//! Trackers hold no other state.

use std::rc::Rc;

use crate::{ActivationEvent, AncestorWindow, GeometryEvent, Listener, WindowId};

/// Receives geometry notifications relayed by a [`GeometryTracker`].
pub trait GeometryObserver {
    fn anchor_resized(&mut self);
    fn anchor_moved(&mut self);
    fn anchor_shown(&mut self);
    fn anchor_hidden(&mut self);
}

/// Receives activation notifications relayed by an [`ActivationTracker`].
pub trait ActivationObserver {
    fn host_activated(&mut self);
    fn host_deactivated(&mut self);
    fn host_iconified(&mut self);
    fn host_deiconified(&mut self);
}

/// One listener registration on one ancestor window.
///
/// The handle registered with is kept until detach, so the listener is
/// always removed from the window that received it, even after the anchor
/// surface moved to a different parent. Platform handles are cheap
/// wrappers; holding one does not keep the native window alive.
#[derive(Default)]
struct Registration {
    attached: Option<Rc<dyn AncestorWindow>>,
}

impl Registration {
    fn attach(&mut self, listener: Listener, window: &Rc<dyn AncestorWindow>) {
        let id = window.id();
        if let Some(current) = &self.attached {
            if current.id() == id {
                return;
            }
            self.detach(listener);
        }
        window.add_listener(listener);
        self.attached = Some(Rc::clone(window));
        tracing::debug!(?listener, window = %id, "listener attached");
    }

    fn detach(&mut self, listener: Listener) {
        let Some(window) = self.attached.take() else {
            return;
        };
        window.remove_listener(listener);
        tracing::debug!(?listener, window = %window.id(), "listener detached");
    }

    fn is_attached_to(&self, window: WindowId) -> bool {
        self.attached.as_ref().is_some_and(|w| w.id() == window)
    }
}

/// Keeps the overlay's bounds and visibility in lockstep with the anchor.
#[derive(Default)]
pub struct GeometryTracker {
    registration: Registration,
}

impl GeometryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers for geometry notifications on `window`.
    ///
    /// Attaching to the window this tracker is already attached to is a
    /// no-op; attaching to another window detaches from the first.
    pub fn attach(&mut self, window: &Rc<dyn AncestorWindow>) {
        self.registration.attach(Listener::Geometry, window);
    }

    /// Unregisters from the window attached to, if any.
    pub fn detach(&mut self) {
        self.registration.detach(Listener::Geometry);
    }

    pub fn is_attached(&self) -> bool {
        self.registration.attached.is_some()
    }

    pub fn is_attached_to(&self, window: WindowId) -> bool {
        self.registration.is_attached_to(window)
    }

    /// Invokes exactly one observer reaction for `event`.
    pub fn relay(event: GeometryEvent, observer: &mut impl GeometryObserver) {
        match event {
            GeometryEvent::Resized => observer.anchor_resized(),
            GeometryEvent::Moved => observer.anchor_moved(),
            GeometryEvent::Shown => observer.anchor_shown(),
            GeometryEvent::Hidden => observer.anchor_hidden(),
        }
    }
}

/// Suspends and restores the overlay as the host window loses and regains
/// focus.
#[derive(Default)]
pub struct ActivationTracker {
    registration: Registration,
}

impl ActivationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, window: &Rc<dyn AncestorWindow>) {
        self.registration.attach(Listener::Activation, window);
    }

    pub fn detach(&mut self) {
        self.registration.detach(Listener::Activation);
    }

    pub fn is_attached(&self) -> bool {
        self.registration.attached.is_some()
    }

    pub fn is_attached_to(&self, window: WindowId) -> bool {
        self.registration.is_attached_to(window)
    }

    /// Invokes exactly one observer reaction for `event`.
    ///
    /// Iconify is forwarded like the others, but the engine treats it as a
    /// no-op: minimizing also deactivates the window, and the deactivation
    /// is what suspends the overlay.
    pub fn relay(event: ActivationEvent, observer: &mut impl ActivationObserver) {
        match event {
            ActivationEvent::Activated => observer.host_activated(),
            ActivationEvent::Deactivated => observer.host_deactivated(),
            ActivationEvent::Iconified => observer.host_iconified(),
            ActivationEvent::Deiconified => observer.host_deiconified(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct CountingWindow {
        id: WindowId,
        calls: RefCell<Vec<(&'static str, Listener)>>,
    }

    impl CountingWindow {
        fn new(id: usize) -> Rc<Self> {
            Rc::new(Self {
                id: WindowId(id),
                calls: RefCell::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(&'static str, Listener)> {
            self.calls.borrow().clone()
        }
    }

    impl AncestorWindow for CountingWindow {
        fn id(&self) -> WindowId {
            self.id
        }

        fn add_listener(&self, listener: Listener) {
            self.calls.borrow_mut().push(("add", listener));
        }

        fn remove_listener(&self, listener: Listener) {
            self.calls.borrow_mut().push(("remove", listener));
        }
    }

    /// A short-lived handle to a `CountingWindow`, like the wrappers a
    /// platform creates on each ancestor lookup.
    struct Handle(Rc<CountingWindow>);

    impl AncestorWindow for Handle {
        fn id(&self) -> WindowId {
            self.0.id()
        }

        fn add_listener(&self, listener: Listener) {
            self.0.add_listener(listener);
        }

        fn remove_listener(&self, listener: Listener) {
            self.0.remove_listener(listener);
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl GeometryObserver for Recorder {
        fn anchor_resized(&mut self) {
            self.0.push("resized");
        }
        fn anchor_moved(&mut self) {
            self.0.push("moved");
        }
        fn anchor_shown(&mut self) {
            self.0.push("shown");
        }
        fn anchor_hidden(&mut self) {
            self.0.push("hidden");
        }
    }

    impl ActivationObserver for Recorder {
        fn host_activated(&mut self) {
            self.0.push("activated");
        }
        fn host_deactivated(&mut self) {
            self.0.push("deactivated");
        }
        fn host_iconified(&mut self) {
            self.0.push("iconified");
        }
        fn host_deiconified(&mut self) {
            self.0.push("deiconified");
        }
    }

    #[test]
    fn attach_registers_once_per_window() {
        // Arrange
        let window = CountingWindow::new(1);
        let handle: Rc<dyn AncestorWindow> = window.clone();
        let mut tracker = GeometryTracker::new();

        // Act
        tracker.attach(&handle);
        tracker.attach(&handle);

        // Assert
        assert_eq!(window.calls(), vec![("add", Listener::Geometry)]);
        assert!(tracker.is_attached_to(WindowId(1)));
    }

    #[test]
    fn detach_without_attach_is_silent() {
        let mut tracker = ActivationTracker::new();
        tracker.detach();
        assert!(!tracker.is_attached());
    }

    #[test]
    fn attach_to_new_window_moves_registration() {
        // Arrange
        let first = CountingWindow::new(1);
        let second = CountingWindow::new(2);
        let first_handle: Rc<dyn AncestorWindow> = first.clone();
        let second_handle: Rc<dyn AncestorWindow> = second.clone();
        let mut tracker = ActivationTracker::new();
        tracker.attach(&first_handle);

        // Act
        tracker.attach(&second_handle);

        // Assert
        assert_eq!(
            first.calls(),
            vec![("add", Listener::Activation), ("remove", Listener::Activation)]
        );
        assert_eq!(second.calls(), vec![("add", Listener::Activation)]);
        assert!(tracker.is_attached_to(WindowId(2)));
        assert!(!tracker.is_attached_to(WindowId(1)));
    }

    #[test]
    fn detach_reaches_window_after_caller_drops_handle() {
        // Arrange
        let window = CountingWindow::new(7);
        let mut tracker = GeometryTracker::new();
        {
            let handle: Rc<dyn AncestorWindow> = Rc::new(Handle(window.clone()));
            tracker.attach(&handle);
        }

        // Act
        tracker.detach();

        // Assert
        assert_eq!(
            window.calls(),
            vec![("add", Listener::Geometry), ("remove", Listener::Geometry)]
        );
        assert!(!tracker.is_attached());
    }

    #[test]
    fn geometry_relay_maps_each_event_to_one_reaction() {
        // Arrange
        let mut recorder = Recorder::default();

        // Act
        for event in [
            GeometryEvent::Resized,
            GeometryEvent::Moved,
            GeometryEvent::Shown,
            GeometryEvent::Hidden,
        ] {
            GeometryTracker::relay(event, &mut recorder);
        }

        // Assert
        assert_eq!(recorder.0, vec!["resized", "moved", "shown", "hidden"]);
    }

    #[test]
    fn activation_relay_maps_each_event_to_one_reaction() {
        let mut recorder = Recorder::default();

        ActivationTracker::relay(ActivationEvent::Iconified, &mut recorder);
        ActivationTracker::relay(ActivationEvent::Deactivated, &mut recorder);
        ActivationTracker::relay(ActivationEvent::Deiconified, &mut recorder);
        ActivationTracker::relay(ActivationEvent::Activated, &mut recorder);

        assert_eq!(
            recorder.0,
            vec!["iconified", "deactivated", "deiconified", "activated"]
        );
    }
}
