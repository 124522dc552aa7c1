use chrono::{DateTime, Utc};
use runscope_core::{AppError, AppResult};
use runscope_domain::{
    ActivityDescriptor, ExecutionLogRecord, StorageDriverDescriptor, VariableTypeDescriptor,
    WorkflowInstance,
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListResponseDto<T> {
    pub(super) items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JournalPageDto {
    pub(super) items: Vec<ExecutionLogRecordDto>,
    pub(super) total_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ExecutionLogRecordDto {
    id: String,
    activity_instance_id: String,
    #[serde(default)]
    parent_activity_instance_id: Option<String>,
    activity_id: String,
    activity_type: String,
    #[serde(default)]
    node_id: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    sequence: i64,
    #[serde(default)]
    event_name: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
}

impl From<ExecutionLogRecordDto> for ExecutionLogRecord {
    fn from(value: ExecutionLogRecordDto) -> Self {
        Self {
            id: value.id,
            activity_instance_id: value.activity_instance_id,
            parent_activity_instance_id: value.parent_activity_instance_id,
            activity_id: value.activity_id,
            activity_type: value.activity_type,
            node_id: value.node_id,
            timestamp: value.timestamp,
            sequence: value.sequence,
            event_name: value.event_name,
            message: value.message,
            source: value.source,
            payload: value.payload,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WorkflowInstanceDto {
    id: String,
    definition_id: String,
    #[serde(default)]
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<WorkflowInstanceDto> for WorkflowInstance {
    type Error = AppError;

    fn try_from(value: WorkflowInstanceDto) -> AppResult<Self> {
        Self::new(value.id, value.definition_id, value.name, value.created_at)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ActivityDescriptorDto {
    type_name: String,
    #[serde(default)]
    namespace: String,
    name: String,
    #[serde(default = "default_version")]
    version: i32,
    #[serde(default)]
    category: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn default_version() -> i32 {
    1
}

impl From<ActivityDescriptorDto> for ActivityDescriptor {
    fn from(value: ActivityDescriptorDto) -> Self {
        Self {
            display_name: value.display_name.unwrap_or_else(|| value.name.clone()),
            type_name: value.type_name,
            namespace: value.namespace,
            name: value.name,
            version: value.version,
            category: value.category,
            description: value.description,
            synthesized: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VariableTypeDescriptorDto {
    type_name: String,
    display_name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: Option<String>,
}

impl From<VariableTypeDescriptorDto> for VariableTypeDescriptor {
    fn from(value: VariableTypeDescriptorDto) -> Self {
        Self {
            type_name: value.type_name,
            display_name: value.display_name,
            category: value.category,
            description: value.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StorageDriverDescriptorDto {
    type_name: String,
    display_name: String,
}

impl From<StorageDriverDescriptorDto> for StorageDriverDescriptor {
    fn from(value: StorageDriverDescriptorDto) -> Self {
        Self {
            type_name: value.type_name,
            display_name: value.display_name,
        }
    }
}
