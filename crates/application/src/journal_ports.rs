mod registry;
mod render_target;
mod source;

pub use registry::{ActivityDisplaySettingsRegistry, ActivityRegistry};
pub use render_target::JournalRenderTarget;
pub use source::{JournalPage, WorkflowInstanceLookup, WorkflowJournalSource};
