//! Player profile and preferences
//!
//! Persisted separately from the leaderboard in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::highscores::MAX_NAME_LEN;

/// Shirt colours offered on the profile screen
pub const SHIRT_COLORS: [&str; 10] = [
    "#FF6B35", "#E74C3C", "#3498DB", "#2ECC71", "#9B59B6", "#FF69B4", "#F1C40F", "#1ABC9C", "#ECF0F1",
    "#E67E22",
];

/// Pants colours offered on the profile screen
pub const PANTS_COLORS: [&str; 5] = ["#2C3E50", "#1a1a1a", "#1E5B2A", "#8B4513", "#7F8C8D"];

/// Cosmetic profile and audio preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display name, prefilled on the leaderboard
    pub name: String,
    pub shirt_color: String,
    pub pants_color: String,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: String::new(),
            shirt_color: SHIRT_COLORS[0].to_string(),
            pants_color: PANTS_COLORS[0].to_string(),
            muted: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "parkour_master_profile";

    pub fn set_name(&mut self, name: &str) {
        self.name = name.chars().take(MAX_NAME_LEN).collect();
    }

    /// Pick a shirt colour; colours outside the palette are ignored
    pub fn set_shirt_color(&mut self, color: &str) -> bool {
        match palette_match(&SHIRT_COLORS, color) {
            Some(c) => {
                self.shirt_color = c.to_string();
                true
            }
            None => false,
        }
    }

    /// Pick a pants colour; colours outside the palette are ignored
    pub fn set_pants_color(&mut self, color: &str) -> bool {
        match palette_match(&PANTS_COLORS, color) {
            Some(c) => {
                self.pants_color = c.to_string();
                true
            }
            None => false,
        }
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Parse stored settings, repairing anything out of range
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Replace unknown colours with defaults and enforce the name limit
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        if palette_match(&SHIRT_COLORS, &self.shirt_color).is_none() {
            self.shirt_color = defaults.shirt_color;
        }
        if palette_match(&PANTS_COLORS, &self.pants_color).is_none() {
            self.pants_color = defaults.pants_color;
        }
        let name = std::mem::take(&mut self.name);
        self.set_name(&name);
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded profile from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Failed to parse profile: {:?}", e),
                }
            }
        }

        log::info!("Using default profile");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Profile saved"),
                    Err(e) => log::warn!("Failed to save profile: {:?}", e),
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Case-insensitive palette lookup, returning the canonical spelling
fn palette_match<'a>(palette: &[&'a str], color: &str) -> Option<&'a str> {
    palette.iter().copied().find(|c| c.eq_ignore_ascii_case(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.shirt_color, "#FF6B35");
        assert_eq!(settings.pants_color, "#2C3E50");
        assert!(settings.name.is_empty());
        assert!(!settings.muted);
    }

    #[test]
    fn test_colours_must_come_from_palette() {
        let mut settings = Settings::default();
        assert!(settings.set_shirt_color("#3498db"));
        assert_eq!(settings.shirt_color, "#3498DB");
        assert!(!settings.set_shirt_color("#000000"));
        assert_eq!(settings.shirt_color, "#3498DB");

        assert!(settings.set_pants_color("#1A1A1A"));
        assert_eq!(settings.pants_color, "#1a1a1a");
        assert!(!settings.set_pants_color("#FF6B35"));
    }

    #[test]
    fn test_name_is_truncated() {
        let mut settings = Settings::default();
        settings.set_name("A very long player name indeed");
        assert_eq!(settings.name.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_toggle_muted() {
        let mut settings = Settings::default();
        assert!(settings.toggle_muted());
        assert!(!settings.toggle_muted());
    }

    #[test]
    fn test_from_json_repairs_bad_values() {
        let json = r#"{"name": "Zoe", "shirt_color": "purple", "muted": true}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.name, "Zoe");
        assert_eq!(settings.shirt_color, "#FF6B35");
        assert_eq!(settings.pants_color, "#2C3E50");
        assert!(settings.muted);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Settings::from_json("not json").is_err());
        assert!(Settings::from_json("42").is_err());
        assert!(Settings::from_json(r#"{"muted": "loud"}"#).is_err());
    }
}
