pub mod attach;
pub mod events;
pub mod init;

/// Parses a window handle from a string (supports decimal and 0x hex).
pub fn parse_hwnd(s: &str) -> Result<usize, String> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16)
    } else {
        s.parse()
    };
    match parsed {
        Ok(0) => Err("window handle must not be zero".into()),
        Ok(hwnd) => Ok(hwnd),
        Err(e) => Err(format!("invalid window handle '{s}': {e}")),
    }
}

/// Reports that a command needs the Windows platform and exits.
#[cfg(not(windows))]
pub fn needs_windows(command: &str) -> ! {
    eprintln!("Error: 'tether {command}' needs Windows.");
    std::process::exit(1);
}
