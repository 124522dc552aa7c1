use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use runscope_core::{AppError, AppResult};
use runscope_domain::{
    ActivityDescriptor, ActivityDisplaySettings, ExecutionLogRecord, WorkflowInstance,
};
use tokio::sync::Mutex;

use crate::journal_ports::{
    ActivityDisplaySettingsRegistry, ActivityRegistry, JournalPage, JournalRenderTarget,
    WorkflowJournalSource,
};

pub(crate) const WRITE_LINE: &str = "Elsa.WriteLine";
pub(crate) const DELAY: &str = "Elsa.Delay";

pub(crate) fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .unwrap_or_else(|| unreachable!())
}

pub(crate) fn workflow_instance(id: &str) -> WorkflowInstance {
    WorkflowInstance::new(id, "order-approval", Some("Order approval".to_owned()), origin())
        .unwrap_or_else(|_| unreachable!())
}

/// Offset of record `index`, so that record `index` trails its predecessor by `index * 100ms`.
pub(crate) fn offset_millis(index: usize) -> i64 {
    let index = i64::try_from(index).unwrap_or_else(|_| unreachable!());
    index * (index + 1) / 2 * 100
}

pub(crate) fn record(index: usize, activity_type: &str) -> ExecutionLogRecord {
    ExecutionLogRecord {
        id: format!("record-{index}"),
        activity_instance_id: format!("activity-instance-{index}"),
        parent_activity_instance_id: None,
        activity_id: format!("activity-{index}"),
        activity_type: activity_type.to_owned(),
        node_id: format!("Workflow1:Activity{index}"),
        timestamp: origin() + TimeDelta::milliseconds(offset_millis(index)),
        sequence: i64::try_from(index).unwrap_or_else(|_| unreachable!()),
        event_name: Some("Completed".to_owned()),
        message: None,
        source: None,
        payload: None,
    }
}

pub(crate) fn records(count: usize) -> Vec<ExecutionLogRecord> {
    (0..count)
        .map(|index| {
            let activity_type = if index % 3 == 0 { DELAY } else { WRITE_LINE };
            record(index, activity_type)
        })
        .collect()
}

pub(crate) fn descriptor(type_name: &str, category: &str) -> ActivityDescriptor {
    ActivityDescriptor {
        category: category.to_owned(),
        description: Some(format!("{type_name} activity")),
        synthesized: false,
        ..ActivityDescriptor::placeholder(type_name)
    }
}

#[derive(Default)]
pub(crate) struct FakeJournalSource {
    pub(crate) records: Mutex<Vec<ExecutionLogRecord>>,
    pub(crate) calls: Mutex<Vec<(String, usize, usize)>>,
    pub(crate) fail: AtomicBool,
}

impl FakeJournalSource {
    pub(crate) fn with_records(records: Vec<ExecutionLogRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }
}

#[async_trait]
impl WorkflowJournalSource for FakeJournalSource {
    async fn fetch_journal_page(
        &self,
        workflow_instance_id: &str,
        skip: usize,
        take: usize,
    ) -> AppResult<JournalPage> {
        self.calls
            .lock()
            .await
            .push((workflow_instance_id.to_owned(), skip, take));

        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable(
                "journal backend unavailable".to_owned(),
            ));
        }

        let records = self.records.lock().await;
        Ok(JournalPage {
            records: records.iter().skip(skip).take(take).cloned().collect(),
            total_count: records.len(),
        })
    }
}

pub(crate) struct FakeActivityRegistry {
    pub(crate) descriptors: Vec<ActivityDescriptor>,
    pub(crate) calls: AtomicUsize,
    pub(crate) fail: AtomicBool,
}

impl Default for FakeActivityRegistry {
    fn default() -> Self {
        Self {
            descriptors: vec![
                descriptor(WRITE_LINE, "Console"),
                descriptor(DELAY, "Scheduling"),
            ],
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ActivityRegistry for FakeActivityRegistry {
    async fn list_activity_descriptors(&self) -> AppResult<Vec<ActivityDescriptor>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Unavailable("activity registry offline".to_owned()));
        }

        Ok(self.descriptors.clone())
    }
}

pub(crate) struct FakeDisplaySettingsRegistry;

impl ActivityDisplaySettingsRegistry for FakeDisplaySettingsRegistry {
    fn settings_for(&self, activity_type: &str) -> ActivityDisplaySettings {
        ActivityDisplaySettings {
            color: if activity_type == DELAY {
                "#f59e0b".to_owned()
            } else {
                "#0ea5e9".to_owned()
            },
            icon: Some(activity_type.to_lowercase()),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingRenderTarget {
    pub(crate) refreshes: AtomicUsize,
}

#[async_trait]
impl JournalRenderTarget for RecordingRenderTarget {
    async fn refresh(&self) -> AppResult<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
