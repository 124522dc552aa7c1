use std::collections::HashMap;

use runscope_application::ActivityDisplaySettingsRegistry;
use runscope_domain::ActivityDisplaySettings;

const DEFAULT_ACTIVITY_COLOR: &str = "#6b7280";

/// Display settings registry with fixed per-type entries and a fallback.
#[derive(Debug, Clone)]
pub struct StaticActivityDisplaySettingsRegistry {
    settings: HashMap<String, ActivityDisplaySettings>,
    fallback: ActivityDisplaySettings,
}

impl Default for StaticActivityDisplaySettingsRegistry {
    fn default() -> Self {
        Self::new(ActivityDisplaySettings {
            color: DEFAULT_ACTIVITY_COLOR.to_owned(),
            icon: None,
        })
    }
}

impl StaticActivityDisplaySettingsRegistry {
    /// Creates a registry that answers every type with `fallback`.
    #[must_use]
    pub fn new(fallback: ActivityDisplaySettings) -> Self {
        Self {
            settings: HashMap::new(),
            fallback,
        }
    }

    /// Adds settings for one activity type.
    #[must_use]
    pub fn with_settings(
        mut self,
        activity_type: impl Into<String>,
        settings: ActivityDisplaySettings,
    ) -> Self {
        self.settings.insert(activity_type.into(), settings);
        self
    }
}

impl ActivityDisplaySettingsRegistry for StaticActivityDisplaySettingsRegistry {
    fn settings_for(&self, activity_type: &str) -> ActivityDisplaySettings {
        self.settings
            .get(activity_type)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
