use std::sync::Once;

use tether_core::config::Color;
use tether_core::{OverlayWindow, Point, Rect, Size, WindowResult};
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, DeleteObject, EndPaint, FillRect, InvalidateRect, PAINTSTRUCT,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CW_USEDEFAULT, CreateWindowExW, DefWindowProcW, DestroyWindow, GWLP_USERDATA, GetClientRect,
    GetWindowLongPtrW, HWND_TOPMOST, IsWindowVisible, LWA_ALPHA, RegisterClassW, SET_WINDOW_POS_FLAGS,
    SW_HIDE, SW_SHOWNOACTIVATE, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SetLayeredWindowAttributes,
    SetWindowLongPtrW, SetWindowPos, ShowWindow, WM_ERASEBKGND, WM_PAINT, WNDCLASSW, WS_EX_LAYERED,
    WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};
use windows::core::w;

/// A translucent, click-through window filled with a solid color.
///
/// Sits topmost over the video area. Input passes through to the player
/// underneath and the frame never takes focus.
pub struct OverlayFrame {
    hwnd: HWND,
}

static REGISTER_CLASS: Once = Once::new();

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(overlay_wnd_proc),
            lpszClassName: w!("TetherOverlay"),
            ..Default::default()
        };
        unsafe {
            RegisterClassW(&wc);
        }
    });
}

/// Packs a color into the `COLORREF` layout (0x00BBGGRR).
fn colorref(color: Color) -> COLORREF {
    COLORREF(u32::from(color.r) | (u32::from(color.g) << 8) | (u32::from(color.b) << 16))
}

unsafe extern "system" fn overlay_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // The paint handler covers the whole client area.
        WM_ERASEBKGND => LRESULT(1),
        WM_PAINT => {
            // SAFETY: the fill color was stored in GWLP_USERDATA by
            // `OverlayFrame::new`; all GDI objects are released below.
            unsafe {
                let fill = COLORREF(GetWindowLongPtrW(hwnd, GWLP_USERDATA) as u32);
                let mut ps = PAINTSTRUCT::default();
                let hdc = BeginPaint(hwnd, &mut ps);
                let mut client = RECT::default();
                if GetClientRect(hwnd, &mut client).is_ok() {
                    let brush = CreateSolidBrush(fill);
                    FillRect(hdc, &client, brush);
                    let _ = DeleteObject(brush.into());
                }
                let _ = EndPaint(hwnd, &ps);
            }
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

impl OverlayFrame {
    /// Creates a hidden overlay window with the given fill and opacity.
    pub fn new(color: Color, alpha: u8) -> WindowResult<Self> {
        ensure_class_registered();

        let ex = WS_EX_LAYERED
            | WS_EX_TOOLWINDOW
            | WS_EX_TOPMOST
            | WS_EX_TRANSPARENT
            | WS_EX_NOACTIVATE;
        let hwnd = unsafe {
            CreateWindowExW(
                ex,
                w!("TetherOverlay"),
                w!("Tether Overlay"),
                WS_POPUP,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                0,
                0,
                None,
                None,
                None,
                None,
            )?
        };

        // Wrap immediately so the window is destroyed if styling fails.
        let frame = Self { hwnd };
        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, colorref(color).0 as isize);
            SetLayeredWindowAttributes(hwnd, COLORREF(0), alpha, LWA_ALPHA)?;
        }

        tracing::debug!(hwnd = ?hwnd.0, ?color, alpha, "overlay frame created");
        Ok(frame)
    }

    fn reposition(&self, x: i32, y: i32, width: i32, height: i32, flags: SET_WINDOW_POS_FLAGS) {
        let result = unsafe {
            SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                x,
                y,
                width,
                height,
                flags | SWP_NOACTIVATE,
            )
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to reposition overlay frame");
            return;
        }
        unsafe {
            let _ = InvalidateRect(Some(self.hwnd), None, false);
        }
    }
}

impl OverlayWindow for OverlayFrame {
    fn is_visible(&self) -> bool {
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    fn set_visible(&self, visible: bool) {
        let cmd = if visible { SW_SHOWNOACTIVATE } else { SW_HIDE };
        unsafe {
            let _ = ShowWindow(self.hwnd, cmd);
        }
    }

    fn set_bounds(&self, bounds: Rect) {
        self.reposition(
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            SET_WINDOW_POS_FLAGS(0),
        );
    }

    fn set_size(&self, size: Size) {
        self.reposition(0, 0, size.width, size.height, SWP_NOMOVE);
    }

    fn set_location(&self, location: Point) {
        self.reposition(location.x, location.y, 0, 0, SWP_NOSIZE);
    }
}

impl Drop for OverlayFrame {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}
