use std::rc::Rc;

use tether_core::{AncestorWindow, Listener, Point, Rect, WindowId, WindowResult};

use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::WindowsAndMessaging::{
    GA_ROOT, GetAncestor, GetClientRect, GetForegroundWindow, GetWindowRect, GetWindowTextLengthW,
    GetWindowTextW,
};

use crate::Subscriptions;

/// A window on the Windows platform, wrapping a Win32 `HWND`.
///
/// `HWND` is an opaque handle: a number that identifies a window to the OS.
/// This struct holds that handle and queries the OS lazily.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    /// Creates a new `Window` from a raw handle value (pointer-sized integer).
    ///
    /// This allows callers to construct a `Window` without depending on the
    /// `windows` crate directly.
    pub fn from_raw(handle: usize) -> Self {
        Self {
            hwnd: HWND(handle as *mut _),
        }
    }

    pub fn id(&self) -> WindowId {
        WindowId(self.hwnd.0 as usize)
    }

    /// The current foreground window, if any.
    pub fn foreground() -> Option<Self> {
        // SAFETY: GetForegroundWindow takes no arguments.
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.is_invalid()).then(|| Self::new(hwnd))
    }

    /// The top-level window containing this one (itself if top-level).
    pub fn root(&self) -> Option<Self> {
        // SAFETY: GetAncestor returns a null HWND for invalid handles.
        let root = unsafe { GetAncestor(self.hwnd, GA_ROOT) };
        (!root.is_invalid()).then(|| Self::new(root))
    }

    pub fn title(&self) -> String {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW only read
        // window text into our buffer.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length == 0 {
                return String::new();
            }

            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..copied as usize])
        }
    }

    /// Outer window rectangle in screen coordinates.
    pub fn rect(&self) -> WindowResult<Rect> {
        let mut r = RECT::default();
        unsafe { GetWindowRect(self.hwnd, &mut r)? };
        Ok(Rect::new(r.left, r.top, r.right - r.left, r.bottom - r.top))
    }

    /// Client area rectangle: origin on screen, client size.
    pub fn client_rect(&self) -> WindowResult<Rect> {
        let mut r = RECT::default();
        unsafe { GetClientRect(self.hwnd, &mut r)? };
        let origin = self.client_origin()?;
        Ok(Rect::new(
            origin.x,
            origin.y,
            r.right - r.left,
            r.bottom - r.top,
        ))
    }

    /// Screen position of the client area's top-left corner.
    pub fn client_origin(&self) -> WindowResult<Point> {
        let mut pt = POINT::default();
        // SAFETY: ClientToScreen writes into our local POINT.
        if !unsafe { ClientToScreen(self.hwnd, &mut pt) }.as_bool() {
            return Err(format!("ClientToScreen failed for {}", self.id()).into());
        }
        Ok(Point::new(pt.x, pt.y))
    }
}

/// A top-level window that hosts the anchor surface.
///
/// Listener registration goes into the shared [`Subscriptions`] the event
/// loop filters on.
pub struct HostWindow {
    window: Window,
    subscriptions: Rc<Subscriptions>,
}

impl HostWindow {
    pub fn new(window: Window, subscriptions: Rc<Subscriptions>) -> Self {
        Self {
            window,
            subscriptions,
        }
    }
}

impl AncestorWindow for HostWindow {
    fn id(&self) -> WindowId {
        self.window.id()
    }

    fn add_listener(&self, listener: Listener) {
        self.subscriptions.add(self.window.id(), listener);
    }

    fn remove_listener(&self, listener: Listener) {
        self.subscriptions.remove(self.window.id(), listener);
    }
}
