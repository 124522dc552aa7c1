//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod input_definition;
mod journal;
mod journal_window;

pub use input_definition::{
    InputDefinition, StorageDriverDescriptor, UiHintDescriptor, VariableTypeDescriptor,
    humanize_name, next_input_name,
};
pub use journal::{
    ActivityDescriptor, ActivityDisplaySettings, ExecutionLogRecord, JournalEntry,
    TimeMetricMode, WorkflowInstance, format_time_metric, time_metric,
};
pub use journal_window::{DEFAULT_JOURNAL_PAGE_SIZE, FetchRequest, FetchResult, JournalWindow};
