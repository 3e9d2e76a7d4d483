use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then layers environment
/// variables (prefix `BEATSTORE__`) over it and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("BEATSTORE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let volume = self.audio.initial_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(format!("audio.initial_volume must be within [0, 1], got {volume}"));
        }
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        let step = self.controls.volume_step;
        if !(step > 0.0 && step <= 1.0) {
            return Err(format!("controls.volume_step must be within (0, 1], got {step}"));
        }
        Ok(())
    }

    /// Directory holding the cart, play counts and the log.
    pub fn state_dir(&self) -> PathBuf {
        self.storage
            .state_dir
            .clone()
            .or_else(default_state_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn plays_file(&self) -> PathBuf {
        self.reporting
            .plays_file
            .clone()
            .unwrap_or_else(|| self.state_dir().join("plays.toml"))
    }

    pub fn cart_file(&self) -> PathBuf {
        self.state_dir().join("cart.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| self.state_dir().join("beatstore.log"))
    }
}

/// Resolve the config path from `BEATSTORE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("BEATSTORE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/beatstore/config.toml`
/// or `~/.config/beatstore/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("beatstore").join("config.toml"))
}

/// `$XDG_STATE_HOME/beatstore` or `~/.local/state/beatstore`.
pub fn default_state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("beatstore"))
}
