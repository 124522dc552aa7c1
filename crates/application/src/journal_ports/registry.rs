use async_trait::async_trait;
use runscope_core::AppResult;
use runscope_domain::{ActivityDescriptor, ActivityDisplaySettings};

/// Port for the activity descriptor catalog.
#[async_trait]
pub trait ActivityRegistry: Send + Sync {
    /// Lists every known activity descriptor.
    async fn list_activity_descriptors(&self) -> AppResult<Vec<ActivityDescriptor>>;
}

/// Port for per-activity presentation settings.
pub trait ActivityDisplaySettingsRegistry: Send + Sync {
    /// Returns display settings for one activity type.
    fn settings_for(&self, activity_type: &str) -> ActivityDisplaySettings;
}
