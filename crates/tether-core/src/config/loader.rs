use std::path::PathBuf;

use super::Config;

/// Returns the config directory: `~/.config/tether/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("tether"))
}

/// Returns the config file path: `~/.config/tether/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
///
/// Returns `Ok(Config)` on success, or an error string describing
/// what went wrong (IO error, parse error, etc.).
pub fn try_load() -> Result<Config, String> {
    let path = config_path().ok_or("could not determine config path")?;
    let content = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
    parse(&content).map_err(|e| format!("{}: {e}", path.display()))
}

/// Loads the configuration from disk, falling back to defaults.
///
/// After loading, values are clamped to safe ranges via [`Config::validate`].
/// A missing file silently returns defaults; other errors are reported.
pub fn load() -> Config {
    let exists = config_path().is_some_and(|p| p.exists());
    match try_load() {
        Ok(config) => config,
        Err(_) if !exists => Config::default(),
        Err(e) => {
            eprintln!("Warning: {e}");
            Config::default()
        }
    }
}

fn parse(content: &str) -> Result<Config, toml::de::Error> {
    let mut config: Config = toml::from_str(content)?;
    config.validate();
    Ok(config)
}
