//! Session service for app-lifetime values.
//!
//! View code never reaches for process-wide state directly; it goes
//! through a [`Session`] that is explicitly initialised at startup.

use std::collections::BTreeMap;
use std::fmt::Debug;

use tracing::debug;

use crate::settings::Settings;

/// Key holding the active theme name (`dark` or `light`).
pub const THEME_KEY: &str = "theme";
/// Key holding the path of the most recent export.
pub const LAST_EXPORT_KEY: &str = "last_export";

/// App-lifetime key/value state.
pub trait Session: Send + Debug {
    /// Seed the session from settings. Called once before use.
    fn init(&mut self, settings: &Settings);

    fn get(&self, key: &str) -> Option<&str>;

    fn set(&mut self, key: &str, value: String);

    /// Drop every stored value.
    fn clear(&mut self);
}

/// In-memory session, discarded on exit.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: BTreeMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Session for MemorySession {
    fn init(&mut self, settings: &Settings) {
        self.values.clear();
        self.values
            .insert(THEME_KEY.to_string(), settings.theme.name().to_string());
        debug!(theme = settings.theme.name(), "session initialised");
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ThemeMode;

    #[test]
    fn test_init_seeds_theme() {
        let settings = Settings {
            theme: ThemeMode::Light,
            ..Settings::default()
        };
        let mut session = MemorySession::new();
        session.set(LAST_EXPORT_KEY, "stale.csv".into());
        session.init(&settings);

        assert_eq!(session.get(THEME_KEY), Some("light"));
        assert!(session.get(LAST_EXPORT_KEY).is_none());
    }

    #[test]
    fn test_set_get_clear() {
        let mut session = MemorySession::new();
        session.set(LAST_EXPORT_KEY, "cases.csv".into());
        assert_eq!(session.get(LAST_EXPORT_KEY), Some("cases.csv"));

        session.clear();
        assert!(session.get(LAST_EXPORT_KEY).is_none());
    }
}
