/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! User settings, stored as TOML in the config directory.

pub mod keybinds;

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutSettings;
use crate::run::DEFAULT_STEP_DELAY;

pub use keybinds::KeyBindings;

/// Get the config directory for graphlab
pub fn config_dir() -> PathBuf {
    match dirs::config_dir() {
        Some(config_home) => config_home.join("graphlab"),
        None => PathBuf::from(".graphlab"),
    }
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Delay between auto steps in milliseconds
    pub step_delay_ms: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY.as_millis() as u64,
        }
    }
}

impl RunSettings {
    /// Auto step delay. Zero falls back to the built-in default.
    pub fn step_delay(&self) -> Duration {
        match self.step_delay_ms {
            0 => DEFAULT_STEP_DELAY,
            ms => Duration::from_millis(ms),
        }
    }
}

/// Everything configurable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub run: RunSettings,
    pub layout: LayoutSettings,
    pub keys: KeyBindings,
}

impl Settings {
    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from `path`, falling back to defaults if the file is
    /// missing or invalid
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Could not read settings from {}: {e}", path.display());
                return Self::default();
            },
        };

        match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring invalid settings in {}: {e}", path.display());
                Self::default()
            },
        }
    }

    /// Save settings to the default location
    pub fn save(&self) -> std::io::Result<()> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, toml_string)
    }

    /// Path of the settings file
    pub fn default_path() -> PathBuf {
        config_dir().join("settings.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.toml"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.run.step_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.run.step_delay_ms = 250;
        settings.layout.grid_spacing = 80.0;
        settings.layout.force.iterations = 10;
        settings.keys.step = "s".to_string();
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[run]\nstep_delay_ms = 300\n\n[layout.force]\nk = 50.0\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.run.step_delay(), Duration::from_millis(300));
        assert_eq!(settings.layout.force.k, 50.0);
        assert_eq!(settings.layout.force.iterations, 100);
        assert_eq!(settings.layout.tree_spacing, 120.0);
        assert_eq!(settings.keys, KeyBindings::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "run = [not toml").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_zero_delay_falls_back() {
        let run = RunSettings { step_delay_ms: 0 };
        assert_eq!(run.step_delay(), DEFAULT_STEP_DELAY);
    }
}
