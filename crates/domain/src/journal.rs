use chrono::{DateTime, TimeDelta, Utc};
use runscope_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Workflow instance that owns one execution journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInstance {
    id: NonEmptyString,
    definition_id: String,
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl WorkflowInstance {
    /// Creates a validated workflow instance reference.
    pub fn new(
        id: impl Into<String>,
        definition_id: impl Into<String>,
        name: Option<String>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let name = name.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            id: NonEmptyString::new(id)?,
            definition_id: definition_id.into(),
            name,
            created_at,
        })
    }

    /// Returns the instance identifier.
    #[must_use]
    pub fn id(&self) -> &NonEmptyString {
        &self.id
    }

    /// Returns the workflow definition identifier.
    #[must_use]
    pub fn definition_id(&self) -> &str {
        self.definition_id.as_str()
    }

    /// Returns the optional instance name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the creation timestamp, the origin for absolute time metrics.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One immutable record of a workflow instance execution journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogRecord {
    /// Opaque record identifier.
    pub id: String,
    /// Activity instance that produced the record.
    pub activity_instance_id: String,
    /// Parent activity instance when nested.
    pub parent_activity_instance_id: Option<String>,
    /// Activity identifier inside the workflow definition.
    pub activity_id: String,
    /// Activity type name, the key into the descriptor catalog.
    pub activity_type: String,
    /// Designer node identifier.
    pub node_id: String,
    /// Point in time the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Backend sequence number.
    pub sequence: i64,
    /// Optional event name such as `Started` or `Completed`.
    pub event_name: Option<String>,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Optional source location.
    pub source: Option<String>,
    /// Arbitrary record payload.
    pub payload: Option<Value>,
}

/// Static metadata describing one activity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDescriptor {
    /// Fully qualified activity type name.
    pub type_name: String,
    /// Type namespace.
    pub namespace: String,
    /// Short type name.
    pub name: String,
    /// Descriptor version.
    pub version: i32,
    /// Toolbox category.
    pub category: String,
    /// User-facing display name.
    pub display_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Set on descriptors synthesized for activity types missing from the catalog.
    #[serde(default)]
    pub synthesized: bool,
}

impl ActivityDescriptor {
    /// Category assigned to synthesized descriptors.
    pub const UNKNOWN_CATEGORY: &'static str = "Unknown";

    /// Synthesizes a descriptor for an activity type missing from the catalog.
    #[must_use]
    pub fn placeholder(type_name: &str) -> Self {
        let (namespace, name) = match type_name.rsplit_once('.') {
            Some((namespace, name)) => (namespace.to_owned(), name.to_owned()),
            None => (String::new(), type_name.to_owned()),
        };

        Self {
            type_name: type_name.to_owned(),
            namespace,
            display_name: name.clone(),
            name,
            version: 1,
            category: Self::UNKNOWN_CATEGORY.to_owned(),
            description: None,
            synthesized: true,
        }
    }

    /// Returns whether this descriptor was synthesized.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.synthesized
    }
}

/// Presentation settings for one activity type, passed through to the host unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDisplaySettings {
    /// CSS color value.
    pub color: String,
    /// Optional icon identifier.
    pub icon: Option<String>,
}

/// How the time metric of a journal entry is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeMetricMode {
    /// Time elapsed since the previous record.
    #[default]
    Relative,
    /// Time elapsed since the workflow instance was created.
    Absolute,
}

impl TimeMetricMode {
    /// Returns stable configuration value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Absolute => "absolute",
        }
    }

    /// Parses configuration value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "relative" => Ok(Self::Relative),
            "absolute" => Ok(Self::Absolute),
            _ => Err(AppError::Validation(format!(
                "unknown time metric mode '{value}'"
            ))),
        }
    }

    /// Maps the journal toggle button state, where `true` selects absolute time.
    #[must_use]
    pub fn from_toggle(absolute: bool) -> Self {
        if absolute {
            Self::Absolute
        } else {
            Self::Relative
        }
    }
}

/// Computes the time metric of `current`.
///
/// Relative mode measures from `previous` and yields zero without one. Absolute
/// mode measures from `origin` and ignores `previous`.
#[must_use]
pub fn time_metric(
    mode: TimeMetricMode,
    current: &ExecutionLogRecord,
    previous: Option<&ExecutionLogRecord>,
    origin: DateTime<Utc>,
) -> TimeDelta {
    match mode {
        TimeMetricMode::Relative => previous
            .map(|previous| current.timestamp - previous.timestamp)
            .unwrap_or_else(TimeDelta::zero),
        TimeMetricMode::Absolute => current.timestamp - origin,
    }
}

/// Formats a time metric for display, e.g. `1.250s` or `01:02:03.004`.
#[must_use]
pub fn format_time_metric(metric: TimeDelta) -> String {
    let total_millis = metric.num_milliseconds();
    let sign = if total_millis < 0 { "-" } else { "" };
    let total_millis = total_millis.unsigned_abs();
    let millis = total_millis % 1_000;
    let total_seconds = total_millis / 1_000;

    if total_seconds < 60 {
        return format!("{sign}{total_seconds}.{millis:03}s");
    }

    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3_600;
    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Display row pairing a record with its descriptor and computed metric.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    /// Underlying journal record.
    pub record: ExecutionLogRecord,
    /// Descriptor of the record activity type.
    pub activity_descriptor: ActivityDescriptor,
    /// Display settings of the record activity type.
    pub display_settings: ActivityDisplaySettings,
    /// Row alternation flag relative to the fetched batch.
    pub is_even: bool,
    /// Computed time metric.
    pub time_metric: TimeDelta,
}
