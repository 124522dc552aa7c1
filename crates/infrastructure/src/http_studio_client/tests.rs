use reqwest::StatusCode;
use runscope_core::AppError;
use runscope_domain::{ActivityDescriptor, ExecutionLogRecord, WorkflowInstance};
use url::Url;

use super::dto::{ActivityDescriptorDto, JournalPageDto, WorkflowInstanceDto};
use super::{HttpStudioClient, status_error};

fn client(base_url: &str) -> HttpStudioClient {
    let base_url = Url::parse(base_url).unwrap_or_else(|_| unreachable!());
    HttpStudioClient::new(reqwest::Client::new(), base_url, Some("secret".to_owned()))
}

#[test]
fn endpoint_appends_segments_to_base_path() {
    let client = client("https://studio.example.com/elsa/api/");

    let url = client.endpoint(&["workflow-instances", "instance-1", "journal"]);
    assert!(url.is_ok());
    assert_eq!(
        url.unwrap_or_else(|_| unreachable!()).as_str(),
        "https://studio.example.com/elsa/api/workflow-instances/instance-1/journal"
    );
}

#[test]
fn endpoint_encodes_identifiers() {
    let client = client("https://studio.example.com/elsa/api");

    let url = client.endpoint(&["workflow-instances", "a/b c"]);
    assert!(url.is_ok());
    assert_eq!(
        url.unwrap_or_else(|_| unreachable!()).as_str(),
        "https://studio.example.com/elsa/api/workflow-instances/a%2Fb%20c"
    );
}

#[test]
fn blank_token_is_ignored() {
    let base_url = Url::parse("https://studio.example.com").unwrap_or_else(|_| unreachable!());
    let client = HttpStudioClient::new(reqwest::Client::new(), base_url, Some("  ".to_owned()));
    assert!(client.api_token.is_none());
}

#[test]
fn status_error_separates_transient_failures() {
    let url = Url::parse("https://studio.example.com/api").unwrap_or_else(|_| unreachable!());

    assert!(matches!(
        status_error(StatusCode::SERVICE_UNAVAILABLE, &url, "down"),
        AppError::Unavailable(_)
    ));
    assert!(matches!(
        status_error(StatusCode::TOO_MANY_REQUESTS, &url, "slow down"),
        AppError::Unavailable(_)
    ));
    assert!(matches!(
        status_error(StatusCode::UNAUTHORIZED, &url, "denied"),
        AppError::Internal(_)
    ));
}

#[test]
fn journal_page_payload_maps_to_records() {
    let payload = serde_json::json!({
        "items": [{
            "id": "record-1",
            "activityInstanceId": "activity-instance-1",
            "parentActivityInstanceId": null,
            "activityId": "WriteLine1",
            "activityType": "Elsa.WriteLine",
            "nodeId": "Workflow1:WriteLine1",
            "timestamp": "2024-05-01T09:30:01.250Z",
            "sequence": 3,
            "eventName": "Completed",
            "payload": { "text": "hello" }
        }],
        "totalCount": 42
    });

    let page = serde_json::from_value::<JournalPageDto>(payload);
    assert!(page.is_ok());
    let page = page.unwrap_or_else(|_| unreachable!());
    assert_eq!(page.total_count, 42);

    let records: Vec<ExecutionLogRecord> = page.items.into_iter().map(Into::into).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].activity_type, "Elsa.WriteLine");
    assert_eq!(records[0].sequence, 3);
    assert_eq!(records[0].event_name.as_deref(), Some("Completed"));
    assert_eq!(records[0].message, None);
    assert_eq!(records[0].timestamp.timestamp_subsec_millis(), 250);
}

#[test]
fn workflow_instance_payload_is_validated() {
    let valid = serde_json::from_value::<WorkflowInstanceDto>(serde_json::json!({
        "id": "instance-1",
        "definitionId": "order-approval",
        "name": "Order approval",
        "createdAt": "2024-05-01T09:30:00Z"
    }));
    assert!(valid.is_ok());
    let instance = WorkflowInstance::try_from(valid.unwrap_or_else(|_| unreachable!()));
    assert!(instance.is_ok());
    assert_eq!(
        instance.unwrap_or_else(|_| unreachable!()).name(),
        Some("Order approval")
    );

    let blank_id = serde_json::from_value::<WorkflowInstanceDto>(serde_json::json!({
        "id": " ",
        "definitionId": "order-approval",
        "createdAt": "2024-05-01T09:30:00Z"
    }));
    assert!(blank_id.is_ok());
    assert!(matches!(
        WorkflowInstance::try_from(blank_id.unwrap_or_else(|_| unreachable!())),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn activity_descriptor_display_name_defaults_to_name() {
    let payload = serde_json::from_value::<ActivityDescriptorDto>(serde_json::json!({
        "typeName": "Elsa.Delay",
        "namespace": "Elsa",
        "name": "Delay",
        "category": "Scheduling"
    }));
    assert!(payload.is_ok());

    let descriptor = ActivityDescriptor::from(payload.unwrap_or_else(|_| unreachable!()));
    assert_eq!(descriptor.display_name, "Delay");
    assert_eq!(descriptor.version, 1);
    assert_eq!(descriptor.category, "Scheduling");
    assert!(!descriptor.is_placeholder());
}

#[test]
fn unknown_category_from_server_is_not_placeholder() {
    let payload = serde_json::from_value::<ActivityDescriptorDto>(serde_json::json!({
        "typeName": "Acme.Legacy",
        "name": "Legacy",
        "category": "Unknown"
    }));
    assert!(payload.is_ok());

    let descriptor = ActivityDescriptor::from(payload.unwrap_or_else(|_| unreachable!()));
    assert_eq!(descriptor.category, ActivityDescriptor::UNKNOWN_CATEGORY);
    assert_eq!(descriptor.description, None);
    assert!(!descriptor.is_placeholder());
}
