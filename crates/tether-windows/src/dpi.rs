use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};

/// Declares this process as per-monitor DPI aware (V2).
///
/// Without it, client coordinates of a player on a scaled monitor would
/// not line up with the overlay's screen coordinates.
///
/// Must be called once at process startup, before creating any windows.
pub fn enable_dpi_awareness() {
    // SAFETY: SetProcessDpiAwarenessContext is safe to call once at startup.
    // It fails when the awareness was already set via manifest.
    let result =
        unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) };
    if let Err(e) = result {
        tracing::debug!(error = %e, "DPI awareness not changed");
    }
}
