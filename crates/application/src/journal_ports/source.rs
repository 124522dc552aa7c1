use async_trait::async_trait;
use runscope_core::AppResult;
use runscope_domain::{ExecutionLogRecord, WorkflowInstance};

/// One backend page of journal records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalPage {
    /// Records in backend order, at most `take` of them.
    pub records: Vec<ExecutionLogRecord>,
    /// Size of the full journal at call time.
    pub total_count: usize,
}

/// Port for reading a workflow instance journal with skip/take pagination.
#[async_trait]
pub trait WorkflowJournalSource: Send + Sync {
    /// Returns records `skip..skip + take` of one instance journal.
    async fn fetch_journal_page(
        &self,
        workflow_instance_id: &str,
        skip: usize,
        take: usize,
    ) -> AppResult<JournalPage>;
}

/// Port for resolving journal owners.
#[async_trait]
pub trait WorkflowInstanceLookup: Send + Sync {
    /// Returns one workflow instance by identifier.
    async fn find_workflow_instance(
        &self,
        workflow_instance_id: &str,
    ) -> AppResult<Option<WorkflowInstance>>;
}
