//! Tests for mock infrastructure
//!
//! These tests drive the controller against a mocked host transport.
//!
//! Run with: cargo test --features test-mocks

#![cfg(feature = "test-mocks")]

use std::sync::Arc;

use mockall::Sequence;
use sdd_hub::host::{HostTransport, MockHostTransport};
use sdd_hub::hub::Controller;
use sdd_hub::model::TaskType;
use sdd_hub::protocol::{Envelope, OutboundMessage};
use serde_json::json;

/// Test that the mock can be created and configured
#[test]
fn test_mock_infrastructure_works() {
    let mut mock_host = MockHostTransport::new();
    mock_host.expect_post().returning(|_| Ok(()));

    let host: Arc<dyn HostTransport> = Arc::new(mock_host);
    assert!(host.post(&OutboundMessage::GetAwsStatus).is_ok());
}

/// Startup posts its requests in a fixed order
#[test]
fn test_startup_order() {
    let mut mock_host = MockHostTransport::new();
    let mut seq = Sequence::new();
    for name in ["getAWSStatus", "getEnhancedAWSStatus", "getEstimationData", "retrieveWipTasks"] {
        mock_host
            .expect_post()
            .withf(move |m: &OutboundMessage| m.command() == name)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
    }

    let mut controller = Controller::new(Arc::new(mock_host)).unwrap();
    controller.startup();
}

/// A task list response followed by paging posts the next offset
#[test]
fn test_paging_posts_next_offset() {
    let mut mock_host = MockHostTransport::new();
    mock_host
        .expect_post()
        .withf(|m: &OutboundMessage| {
            matches!(m, OutboundMessage::RetrieveTasks(TaskType::Wip, req) if req.offset == 20)
        })
        .times(1)
        .returning(|_| Ok(()));

    let mut controller = Controller::new(Arc::new(mock_host)).unwrap();
    let tasks: Vec<_> = (0..20).map(|i| json!({"Id": format!("t{}", i), "Name": "n"})).collect();
    controller.receive(Envelope::new(
        "taskListLoaded",
        Some(json!({
            "tasks": tasks,
            "taskType": "wip",
            "pagination": {"currentOffset": 0, "currentLimit": 20, "totalCount": 30, "hasMore": true}
        })),
    ));
    controller.act(|s| s.next_page());
}

/// Transport errors are absorbed; the UI state still moves on
#[test]
fn test_transport_error_is_absorbed() {
    let mut mock_host = MockHostTransport::new();
    mock_host
        .expect_post()
        .returning(|_| Err(anyhow::anyhow!("host exited")));

    let mut controller = Controller::new(Arc::new(mock_host)).unwrap();
    controller.act(|s| s.search("abc"));
    assert_eq!(controller.state().board.current().search_term, "abc");
}

/// Malformed host payloads never reach the transport
#[test]
fn test_malformed_payload_posts_nothing() {
    let mut mock_host = MockHostTransport::new();
    mock_host.expect_post().times(0);

    let mut controller = Controller::new(Arc::new(mock_host)).unwrap();
    controller.receive(Envelope::new("taskActionResult", Some(json!({"oops": 1}))));
    controller.receive(Envelope::new("showTaskEditForm", Some(json!("not an object"))));
    assert!(controller.state().modal.is_hidden());
}
