/// Translation of raw WinEvents into notifications.
pub mod event;

/// Listener registrations the event loop filters on.
pub mod subscriptions;

/// The video surface as an overlay anchor.
#[cfg(windows)]
pub mod anchor;

/// Ctrl+C handling for the console.
#[cfg(windows)]
pub mod ctrl_c;

#[cfg(windows)]
pub mod dpi;

/// WinEvent hook and message pump.
#[cfg(windows)]
pub mod event_loop;

/// The translucent overlay window.
#[cfg(windows)]
pub mod overlay;

/// Window type wrapping a Win32 `HWND`.
#[cfg(windows)]
pub mod window;

pub use event::Translator;
pub use subscriptions::Subscriptions;

#[cfg(windows)]
pub use anchor::ChildSurface;
#[cfg(windows)]
pub use overlay::OverlayFrame;
#[cfg(windows)]
pub use window::{HostWindow, Window};
