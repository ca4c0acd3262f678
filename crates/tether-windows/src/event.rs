use std::collections::HashMap;

use tether_core::{ActivationEvent, GeometryEvent, Notification, Rect, WindowId};

// WinEvent codes we translate. Kept as plain values so the translation
// logic does not depend on the `windows` crate.
pub const EVENT_SYSTEM_FOREGROUND: u32 = 0x0003;
pub const EVENT_SYSTEM_MINIMIZESTART: u32 = 0x0016;
pub const EVENT_SYSTEM_MINIMIZEEND: u32 = 0x0017;
pub const EVENT_OBJECT_DESTROY: u32 = 0x8001;
pub const EVENT_OBJECT_SHOW: u32 = 0x8002;
pub const EVENT_OBJECT_HIDE: u32 = 0x8003;
pub const EVENT_OBJECT_LOCATIONCHANGE: u32 = 0x800B;

/// Object ID indicating the event applies to the window itself,
/// not a child element like a scrollbar or the caret.
const OBJID_WINDOW: i32 = 0;

/// A WinEvent as received by the hook callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub event: u32,
    /// The window the event was raised for.
    pub hwnd: WindowId,
    /// Its top-level window (`GA_ROOT`); equal to `hwnd` for top-level windows.
    pub root: WindowId,
    pub id_object: i32,
}

impl RawEvent {
    /// True for events that describe the foreground window changing.
    pub fn is_foreground(&self) -> bool {
        self.event == EVENT_SYSTEM_FOREGROUND
    }
}

/// Translates raw WinEvents into platform-agnostic notifications.
///
/// Win32 reports moves and resizes as a single location change and only
/// announces the new foreground window, so the translator keeps the last
/// known rectangle per window and the current foreground window to derive
/// the finer-grained notifications.
#[derive(Debug, Default)]
pub struct Translator {
    foreground: Option<WindowId>,
    rects: HashMap<WindowId, Rect>,
}

impl Translator {
    /// Creates a translator that knows which window is in the foreground.
    pub fn new(foreground: Option<WindowId>) -> Self {
        Self {
            foreground,
            rects: HashMap::new(),
        }
    }

    /// Translates one raw event.
    ///
    /// `rect` is asked for the source window's current rectangle, and only
    /// for location changes. Moves and resizes are reported against the
    /// top-level window so that changes to a child surface reach listeners
    /// registered on its ancestor. Show and hide are reported only for the
    /// top-level window itself.
    pub fn translate(
        &mut self,
        raw: RawEvent,
        rect: impl FnOnce() -> Option<Rect>,
    ) -> Vec<Notification> {
        if raw.id_object != OBJID_WINDOW {
            return Vec::new();
        }

        match raw.event {
            EVENT_SYSTEM_FOREGROUND => self.foreground_changed(raw.root),
            EVENT_SYSTEM_MINIMIZESTART => vec![Notification::activation(
                raw.root,
                ActivationEvent::Iconified,
            )],
            EVENT_SYSTEM_MINIMIZEEND => vec![Notification::activation(
                raw.root,
                ActivationEvent::Deiconified,
            )],
            EVENT_OBJECT_DESTROY => {
                self.forget(raw.hwnd);
                Vec::new()
            }
            // Controls inside the window come and go on their own; only the
            // top-level window's own visibility counts.
            EVENT_OBJECT_SHOW if raw.hwnd == raw.root => {
                vec![Notification::geometry(raw.root, GeometryEvent::Shown)]
            }
            EVENT_OBJECT_HIDE if raw.hwnd == raw.root => {
                vec![Notification::geometry(raw.root, GeometryEvent::Hidden)]
            }
            EVENT_OBJECT_LOCATIONCHANGE => match rect() {
                Some(current) => self.location_changed(raw.hwnd, raw.root, current),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Drops the remembered rectangle of a window that went away.
    pub fn forget(&mut self, window: WindowId) {
        self.rects.remove(&window);
        if self.foreground == Some(window) {
            self.foreground = None;
        }
    }

    fn foreground_changed(&mut self, window: WindowId) -> Vec<Notification> {
        let previous = self.foreground.replace(window);
        if previous == Some(window) {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(2);
        if let Some(previous) = previous {
            out.push(Notification::activation(
                previous,
                ActivationEvent::Deactivated,
            ));
        }
        out.push(Notification::activation(window, ActivationEvent::Activated));
        out
    }

    fn location_changed(
        &mut self,
        source: WindowId,
        root: WindowId,
        current: Rect,
    ) -> Vec<Notification> {
        let previous = self.rects.insert(source, current);
        let moved = previous.is_none_or(|p| p.location() != current.location());
        let resized = previous.is_none_or(|p| p.size() != current.size());

        let mut out = Vec::with_capacity(2);
        if resized {
            out.push(Notification::geometry(root, GeometryEvent::Resized));
        }
        if moved {
            out.push(Notification::geometry(root, GeometryEvent::Moved));
        }
        out
    }
}
