use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use runscope_application::{WorkflowInstanceLookup, WorkflowJournalSource};
use runscope_core::AppError;
use runscope_domain::{ExecutionLogRecord, WorkflowInstance};

use super::InMemoryWorkflowJournal;

fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .unwrap_or_else(|| unreachable!())
}

fn workflow_instance(id: &str) -> WorkflowInstance {
    WorkflowInstance::new(id, "order-approval", None, origin()).unwrap_or_else(|_| unreachable!())
}

fn record(sequence: i64) -> ExecutionLogRecord {
    ExecutionLogRecord {
        id: String::new(),
        activity_instance_id: format!("activity-instance-{sequence}"),
        parent_activity_instance_id: None,
        activity_id: format!("activity-{sequence}"),
        activity_type: "Elsa.WriteLine".to_owned(),
        node_id: format!("Workflow1:Activity{sequence}"),
        timestamp: origin() + TimeDelta::seconds(sequence),
        sequence,
        event_name: Some("Completed".to_owned()),
        message: None,
        source: None,
        payload: None,
    }
}

async fn seeded_journal(record_count: i64) -> InMemoryWorkflowJournal {
    let journal = InMemoryWorkflowJournal::new();
    assert!(
        journal
            .register_instance(workflow_instance("instance-1"))
            .await
            .is_ok()
    );
    for sequence in 0..record_count {
        assert!(
            journal
                .append_record("instance-1", record(sequence))
                .await
                .is_ok()
        );
    }

    journal
}

#[tokio::test]
async fn fetch_journal_page_applies_skip_and_take() {
    let journal = seeded_journal(7).await;

    let page = journal.fetch_journal_page("instance-1", 4, 5).await;
    assert!(page.is_ok());
    let page = page.unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total_count, 7);
    let sequences: Vec<i64> = page.records.iter().map(|record| record.sequence).collect();
    assert_eq!(sequences, vec![4, 5, 6]);
}

#[tokio::test]
async fn skip_past_end_returns_empty_page_with_total() {
    let journal = seeded_journal(3).await;

    let page = journal.fetch_journal_page("instance-1", 10, 5).await;
    assert!(page.is_ok());
    let page = page.unwrap_or_else(|_| unreachable!());
    assert!(page.records.is_empty());
    assert_eq!(page.total_count, 3);
}

#[tokio::test]
async fn append_record_generates_missing_identifier() {
    let journal = seeded_journal(0).await;

    let stored = journal.append_record("instance-1", record(0)).await;
    assert!(stored.is_ok());
    let stored = stored.unwrap_or_else(|_| unreachable!());
    assert!(!stored.id.is_empty());

    let explicit = ExecutionLogRecord {
        id: "record-explicit".to_owned(),
        ..record(1)
    };
    let stored = journal.append_record("instance-1", explicit).await;
    assert_eq!(
        stored.map(|record| record.id).unwrap_or_default(),
        "record-explicit"
    );
}

#[tokio::test]
async fn unknown_instance_is_not_found() {
    let journal = InMemoryWorkflowJournal::new();

    assert!(matches!(
        journal.fetch_journal_page("missing", 0, 10).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        journal.append_record("missing", record(0)).await,
        Err(AppError::NotFound(_))
    ));

    let found = journal.find_workflow_instance("missing").await;
    assert!(found.is_ok());
    assert!(found.unwrap_or_else(|_| unreachable!()).is_none());
}

#[tokio::test]
async fn register_instance_rejects_duplicates() {
    let journal = seeded_journal(0).await;

    assert!(matches!(
        journal
            .register_instance(workflow_instance("instance-1"))
            .await,
        Err(AppError::Conflict(_))
    ));

    let found = journal.find_workflow_instance("instance-1").await;
    assert!(found.is_ok());
    assert_eq!(
        found
            .unwrap_or_else(|_| unreachable!())
            .map(|instance| instance.created_at()),
        Some(origin())
    );
}
