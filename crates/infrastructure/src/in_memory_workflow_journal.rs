use std::collections::HashMap;

use async_trait::async_trait;
use runscope_application::{JournalPage, WorkflowInstanceLookup, WorkflowJournalSource};
use runscope_core::{AppError, AppResult};
use runscope_domain::{ExecutionLogRecord, WorkflowInstance};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug)]
struct StoredJournal {
    workflow_instance: WorkflowInstance,
    records: Vec<ExecutionLogRecord>,
}

/// In-memory workflow instance journals.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowJournal {
    journals: RwLock<HashMap<String, StoredJournal>>,
}

impl InMemoryWorkflowJournal {
    /// Creates an empty in-memory journal store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a workflow instance with an empty journal.
    pub async fn register_instance(&self, workflow_instance: WorkflowInstance) -> AppResult<()> {
        let key = workflow_instance.id().as_str().to_owned();
        let mut journals = self.journals.write().await;

        if journals.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "workflow instance '{key}' already exists"
            )));
        }

        journals.insert(
            key,
            StoredJournal {
                workflow_instance,
                records: Vec::new(),
            },
        );
        Ok(())
    }

    /// Appends one record to an instance journal.
    ///
    /// Records without an identifier receive a generated one.
    pub async fn append_record(
        &self,
        workflow_instance_id: &str,
        mut record: ExecutionLogRecord,
    ) -> AppResult<ExecutionLogRecord> {
        let mut journals = self.journals.write().await;
        let journal = journals.get_mut(workflow_instance_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "workflow instance '{workflow_instance_id}' does not exist"
            ))
        })?;

        if record.id.trim().is_empty() {
            record.id = Uuid::new_v4().to_string();
        }

        journal.records.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl WorkflowJournalSource for InMemoryWorkflowJournal {
    async fn fetch_journal_page(
        &self,
        workflow_instance_id: &str,
        skip: usize,
        take: usize,
    ) -> AppResult<JournalPage> {
        let journals = self.journals.read().await;
        let journal = journals.get(workflow_instance_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "workflow instance '{workflow_instance_id}' does not exist"
            ))
        })?;

        Ok(JournalPage {
            records: journal.records.iter().skip(skip).take(take).cloned().collect(),
            total_count: journal.records.len(),
        })
    }
}

#[async_trait]
impl WorkflowInstanceLookup for InMemoryWorkflowJournal {
    async fn find_workflow_instance(
        &self,
        workflow_instance_id: &str,
    ) -> AppResult<Option<WorkflowInstance>> {
        Ok(self
            .journals
            .read()
            .await
            .get(workflow_instance_id)
            .map(|journal| journal.workflow_instance.clone()))
    }
}

#[cfg(test)]
mod tests;
