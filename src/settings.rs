//! Player preferences
//!
//! Persisted separately from the session in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::narrative::Locale;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display language
    pub locale: Locale,

    // Display
    /// Show archive names above collected fish
    pub show_names: bool,
    /// FPS readout in the corner
    pub show_fps: bool,

    // Accessibility
    /// Reduced motion (no glitch flicker, no overload flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::Zh,
            show_names: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Whether glitch fish should flicker
    pub fn glitch_flicker(&self) -> bool {
        !self.reduced_motion
    }

    /// Whether the red overload overlay may show
    pub fn overload_overlay(&self) -> bool {
        !self.reduced_motion
    }

    /// Parse stored JSON, falling back to defaults on any problem
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Read the stored preferences, or defaults when nothing usable is stored
    pub fn load() -> Self {
        match storage::read(STORAGE_KEY) {
            Some(json) => {
                log::info!("Preferences restored");
                Self::from_json(&json)
            }
            None => Self::default(),
        }
    }

    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => storage::write(STORAGE_KEY, &json),
            Err(e) => log::warn!("Preferences not saved: {}", e),
        }
    }
}

const STORAGE_KEY: &str = "sea_of_disorder_settings";

#[cfg(target_arch = "wasm32")]
mod storage {
    fn local() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    pub fn read(key: &str) -> Option<String> {
        local()?.get_item(key).ok().flatten()
    }

    pub fn write(key: &str, value: &str) {
        if let Some(storage) = local() {
            if storage.set_item(key, value).is_err() {
                log::warn!("LocalStorage rejected {}", key);
            }
        }
    }
}

/// Native builds keep preferences in memory only
#[cfg(not(target_arch = "wasm32"))]
mod storage {
    pub fn read(_key: &str) -> Option<String> {
        None
    }

    pub fn write(_key: &str, _value: &str) {}
}
