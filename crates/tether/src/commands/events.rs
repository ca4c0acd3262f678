use clap::Args;

/// Arguments for the `events` subcommand.
#[derive(Args)]
#[cfg_attr(not(windows), allow(dead_code))]
pub struct EventsArgs {
    /// Window handle to watch (decimal or hex with 0x prefix)
    #[arg(long, value_parser = super::parse_hwnd)]
    hwnd: usize,
}

#[cfg(not(windows))]
pub fn execute(_args: &EventsArgs) {
    super::needs_windows("events");
}

/// Watches notifications for a window's top-level window. Press Ctrl+C to stop.
#[cfg(windows)]
pub fn execute(args: &EventsArgs) {
    use tether_core::{AncestorWindow, Listener};
    use tether_windows::{HostWindow, Subscriptions, Window};

    let Some(root) = Window::from_raw(args.hwnd).root() else {
        eprintln!("Error: 0x{:X} is not a window.", args.hwnd);
        std::process::exit(1);
    };

    let subscriptions = std::rc::Rc::new(Subscriptions::new());
    let host = HostWindow::new(root, subscriptions.clone());
    host.add_listener(Listener::Geometry);
    host.add_listener(Listener::Activation);

    if let Err(e) = tether_windows::ctrl_c::set_handler() {
        eprintln!("Warning: Ctrl+C handler not installed: {e}");
    }

    println!(
        "Watching {} \"{}\" (press Ctrl+C to stop)...\n",
        host.id(),
        root.title()
    );

    let result = tether_windows::event_loop::run(&subscriptions, |n| {
        println!("{n} \"{}\"", Window::from_raw(n.window.0).title());
    });

    if let Err(e) = result {
        eprintln!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
