//! Demo settings
//!
//! Layered: built-in defaults, then LocalStorage, then URL query overrides.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_INITIAL_BALLS;

/// What happens to the balls when the container changes size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResizePolicy {
    /// Throw away all balls and spawn a fresh set
    #[default]
    Reinitialize,
    /// Keep the balls, scaling positions to the new size
    Rescale,
}

impl ResizePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizePolicy::Reinitialize => "reinit",
            ResizePolicy::Rescale => "rescale",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reinit" | "reinitialize" | "reset" => Some(ResizePolicy::Reinitialize),
            "rescale" | "scale" => Some(ResizePolicy::Rescale),
            _ => None,
        }
    }
}

/// Demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Balls spawned on start, reset and (with `Reinitialize`) resize
    pub initial_ball_count: usize,
    pub resize_policy: ResizePolicy,
    /// Fixed RNG seed; time-based when unset
    pub seed: Option<u64>,
    /// Show the ball counter in the HUD
    pub show_ball_count: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_ball_count: 1,
            resize_policy: ResizePolicy::Reinitialize,
            seed: None,
            show_ball_count: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bouncing_balls_settings";

    /// Clamp values that came from storage or the URL into usable ranges
    pub fn sanitized(mut self) -> Self {
        self.initial_ball_count = self.initial_ball_count.clamp(1, MAX_INITIAL_BALLS);
        self
    }

    /// Apply overrides from a URL query string (`?balls=12&seed=7&resize=rescale`).
    /// Unknown keys and unparsable values are ignored.
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "balls" => match value.parse() {
                    Ok(count) => self.initial_ball_count = count,
                    Err(_) => log::warn!("Ignoring balls={}", value),
                },
                "seed" => match value.parse() {
                    Ok(seed) => self.seed = Some(seed),
                    Err(_) => log::warn!("Ignoring seed={}", value),
                },
                "resize" => match ResizePolicy::from_str(value) {
                    Some(policy) => self.resize_policy = policy,
                    None => log::warn!("Ignoring resize={}", value),
                },
                "hud" => self.show_ball_count = value != "0" && value != "false",
                _ => log::debug!("Unknown query key: {}", key),
            }
        }
    }

    /// Parse stored JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Stored settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        // Store the defaults so there is something to edit in devtools
        log::info!("Using default settings");
        let settings = Self::default();
        settings.save();
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No {} store on native, using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.initial_ball_count, 1);
        assert_eq!(s.resize_policy, ResizePolicy::Reinitialize);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"initial_ball_count": 8}"#);
        assert_eq!(s.initial_ball_count, 8);
        assert_eq!(s.resize_policy, ResizePolicy::Reinitialize);
        assert!(s.show_ball_count);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }

    #[test]
    fn test_stored_count_is_clamped() {
        let s = Settings::from_json(r#"{"initial_ball_count": 100000}"#);
        assert_eq!(s.initial_ball_count, MAX_INITIAL_BALLS);
        let s = Settings::from_json(r#"{"initial_ball_count": 0}"#);
        assert_eq!(s.initial_ball_count, 1);
    }

    #[test]
    fn test_query_overrides() {
        let mut s = Settings::default();
        s.apply_query("?balls=12&seed=99&resize=rescale&hud=0");
        assert_eq!(s.initial_ball_count, 12);
        assert_eq!(s.seed, Some(99));
        assert_eq!(s.resize_policy, ResizePolicy::Rescale);
        assert!(!s.show_ball_count);
    }

    #[test]
    fn test_query_ignores_garbage() {
        let mut s = Settings::default();
        s.apply_query("balls=lots&seed=&resize=sideways&&color=red");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_resize_policy_names() {
        for policy in [ResizePolicy::Reinitialize, ResizePolicy::Rescale] {
            assert_eq!(ResizePolicy::from_str(policy.as_str()), Some(policy));
        }
        assert_eq!(ResizePolicy::from_str("SCALE"), Some(ResizePolicy::Rescale));
    }
}
