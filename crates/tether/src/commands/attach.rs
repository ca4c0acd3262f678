use clap::Args;

/// Arguments for the `attach` subcommand.
#[derive(Args)]
#[cfg_attr(not(windows), allow(dead_code))]
pub struct AttachArgs {
    /// Handle of the video surface window (decimal or hex with 0x prefix)
    #[arg(long, value_parser = super::parse_hwnd)]
    hwnd: usize,
    /// Overlay color as hex, overrides the config file
    #[arg(long)]
    color: Option<String>,
    /// Overlay opacity from 0.0 to 1.0, overrides the config file
    #[arg(long)]
    opacity: Option<f64>,
}

#[cfg(not(windows))]
pub fn execute(_args: &AttachArgs) {
    super::needs_windows("attach");
}

/// Shows an overlay over the given window and keeps it there until Ctrl+C.
#[cfg(windows)]
pub fn execute(args: &AttachArgs) {
    use std::rc::Rc;

    use tether_core::{OverlaySynchronizer, OverlayWindow, VideoSurface, config, log};
    use tether_windows::{ChildSurface, OverlayFrame, Subscriptions, Window};

    let mut config = config::load();
    if let Some(color) = &args.color {
        config.overlay.color = color.clone();
    }
    if let Some(opacity) = args.opacity {
        config.overlay.opacity = opacity;
    }
    config.validate();

    log::init(&config.logging);
    tether_windows::dpi::enable_dpi_awareness();

    let frame = match OverlayFrame::new(config.overlay.color(), config.overlay.alpha()) {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("Failed to create overlay window: {e}");
            std::process::exit(1);
        }
    };
    let overlay: Rc<dyn OverlayWindow> = Rc::new(frame);

    let window = Window::from_raw(args.hwnd);
    if window.root().is_none() {
        eprintln!("Error: 0x{:X} is not a window.", args.hwnd);
        std::process::exit(1);
    }

    let subscriptions = Rc::new(Subscriptions::new());
    let surface = ChildSurface::new(window, subscriptions.clone());
    let mut sync = OverlaySynchronizer::new(VideoSurface::Component(Rc::new(surface)));

    if let Err(e) = sync.set_overlay(Some(&overlay)) {
        eprintln!("Cannot attach to 0x{:X}: {e}", args.hwnd);
        std::process::exit(1);
    }
    sync.enable_overlay(true);

    if let Err(e) = tether_windows::ctrl_c::set_handler() {
        tracing::warn!(error = %e, "Ctrl+C handler not installed");
    }

    println!(
        "Overlay attached to 0x{:X} \"{}\" (press Ctrl+C to stop)",
        args.hwnd,
        window.title()
    );

    let result = tether_windows::event_loop::run(&subscriptions, |n| sync.dispatch(n));

    // Unregister before the overlay window is destroyed.
    sync.release();
    drop(sync);
    drop(overlay);

    if let Err(e) = result {
        eprintln!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
