/// Generates the default `config.toml` contents with explanatory comments.
///
/// This is used by `tether init` to create a starter config file that
/// users can immediately edit.
pub fn generate_config() -> String {
    r##"# Tether configuration
# Location: ~/.config/tether/config.toml

[overlay]
# Fill color of the overlay window (hex).
color = "#1e66f5"
# Opacity from 0.05 to 1.0.
opacity = 0.35

[logging]
# Enable file logging to ~/.config/tether/logs/tether.log.
# When disabled, logs go to stderr and honour RUST_LOG.
enabled = false
# Minimum log level: "trace", "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
