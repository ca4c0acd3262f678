//! Ctrl+C signal handler using `SetConsoleCtrlHandler`.

use tether_core::WindowResult;
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};

use crate::event_loop;

/// Registers a handler that stops the event loop on Ctrl+C or Ctrl+Break.
pub fn set_handler() -> WindowResult<()> {
    unsafe { SetConsoleCtrlHandler(Some(handler), true)? };
    Ok(())
}

unsafe extern "system" fn handler(ctrl_type: u32) -> windows::core::BOOL {
    if ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT {
        event_loop::quit();
        return windows::core::BOOL(1);
    }
    windows::core::BOOL(0)
}
