//! Application services and ports for the workflow execution journal.

#![forbid(unsafe_code)]

mod activity_descriptor_cache;
mod input_editor_ports;
mod input_editor_service;
mod journal_ports;
mod journal_viewer;
mod pending_actions_queue;
mod windowed_record_provider;

#[cfg(test)]
mod test_support;

pub use activity_descriptor_cache::{ActivityDescriptorCache, ActivityDescriptorCatalog};
pub use input_editor_ports::{StorageDriverCatalog, VariableTypeCatalog};
pub use input_editor_service::{InputDefinitionDraft, InputEditorService};
pub use journal_ports::{
    ActivityDisplaySettingsRegistry, ActivityRegistry, JournalPage, JournalRenderTarget,
    WorkflowInstanceLookup, WorkflowJournalSource,
};
pub use journal_viewer::JournalViewer;
pub use pending_actions_queue::{PendingAction, PendingActionFuture, PendingActionsQueue};
pub use windowed_record_provider::WindowedRecordProvider;
