//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_studio_client;
mod in_memory_activity_registry;
mod in_memory_workflow_journal;
mod static_activity_display_settings_registry;

pub use http_studio_client::HttpStudioClient;
pub use in_memory_activity_registry::InMemoryActivityRegistry;
pub use in_memory_workflow_journal::InMemoryWorkflowJournal;
pub use static_activity_display_settings_registry::StaticActivityDisplaySettingsRegistry;
