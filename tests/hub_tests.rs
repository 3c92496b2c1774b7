//! End-to-end flows: host envelopes in through the router, commands out
//! through the state's outbox.

use sdd_hub::hub::tasks::ListPhase;
use sdd_hub::hub::HubState;
use sdd_hub::model::TaskType;
use sdd_hub::protocol::{Envelope, OutboundMessage, Router};
use sdd_hub::HubError;
use serde_json::{json, Value};

fn deliver(router: &Router, state: &mut HubState, command: &str, data: Value) {
    router
        .dispatch(state, Envelope::new(command, Some(data)))
        .unwrap();
}

fn sent(state: &mut HubState) -> Vec<&'static str> {
    state.take_outbox().iter().map(|m| m.command()).collect()
}

fn tasks(ids: &[&str]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| json!({"Id": id, "Name": format!("Task {}", id), "Status__c": "In Progress"}))
            .collect(),
    )
}

fn page(tab: &str, ids: &[&str], offset: u32, total: u32) -> Value {
    json!({
        "tasks": tasks(ids),
        "taskType": tab,
        "pagination": {
            "currentOffset": offset,
            "currentLimit": 20,
            "totalCount": total,
            "hasMore": offset + (ids.len() as u32) < total
        }
    })
}

// === Startup Tests ===

#[test]
fn test_startup_requests_status_and_wip_tasks() {
    let mut state = HubState::new();
    state.startup();
    assert_eq!(
        sent(&mut state),
        vec!["getAWSStatus", "getEnhancedAWSStatus", "getEstimationData", "retrieveWipTasks"]
    );
    assert_eq!(state.board.current().phase, ListPhase::Loading);
}

// === Pagination Tests ===

#[test]
fn test_paging_through_results() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    state.startup();
    state.take_outbox();

    let first: Vec<String> = (1..=20).map(|i| format!("t{}", i)).collect();
    let first: Vec<&str> = first.iter().map(String::as_str).collect();
    deliver(&router, &mut state, "taskListLoaded", page("wip", &first, 0, 45));

    let info = state.board.current().page_info();
    assert_eq!(info.range_text, "1-20 of 45 tasks");
    assert_eq!(info.total_pages, 3);
    assert!(info.previous_disabled);

    state.next_page();
    let out = state.take_outbox();
    match out.as_slice() {
        [OutboundMessage::RetrieveTasks(TaskType::Wip, req)] => {
            assert_eq!(req.offset, 20);
            assert_eq!(req.limit, 20);
        }
        other => panic!("unexpected outbox: {:?}", other),
    }

    // A second click while loading does nothing
    state.next_page();
    assert!(state.take_outbox().is_empty());

    deliver(&router, &mut state, "taskListLoaded", page("wip", &["t41", "t42", "t43", "t44", "t45"], 40, 45));
    let info = state.board.current().page_info();
    assert_eq!(info.current_page, 3);
    assert!(info.next_disabled);
    assert_eq!(info.range_text, "41-45 of 45 tasks");
}

// === Search Tests ===

#[test]
fn test_search_with_no_results_shows_term() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();

    state.search("  nothing  ");
    let out = state.take_outbox();
    match out.as_slice() {
        [OutboundMessage::RetrieveTasks(TaskType::Wip, req)] => {
            assert_eq!(req.search_term.as_deref(), Some("nothing"));
            assert_eq!(req.offset, 0);
        }
        other => panic!("unexpected outbox: {:?}", other),
    }

    deliver(&router, &mut state, "taskListLoaded", page("wip", &[], 0, 0));
    let view = state.board.view();
    assert!(view.show_empty);
    assert_eq!(view.empty_message, "No work-in-progress tasks found matching \"nothing\".");
}

#[test]
fn test_blank_search_sends_no_term() {
    let mut state = HubState::new();
    state.search("   ");
    let out = state.take_outbox();
    match out.as_slice() {
        [OutboundMessage::RetrieveTasks(_, req)] => assert!(req.search_term.is_none()),
        other => panic!("unexpected outbox: {:?}", other),
    }
}

#[test]
fn test_null_search_term_in_response_is_accepted() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    state.select_tab(TaskType::Wip);
    state.take_outbox();

    deliver(
        &router,
        &mut state,
        "taskListLoaded",
        json!({
            "tasks": tasks(&["a"]),
            "taskType": "wip",
            "pagination": {"currentOffset": 0, "currentLimit": 20, "totalCount": 1, "hasMore": false, "searchTerm": null}
        }),
    );

    assert_eq!(state.board.current().phase, ListPhase::Populated);
    assert_eq!(state.board.current().rows.len(), 1);
}

// === Tab Tests ===

#[test]
fn test_response_for_other_tab_does_not_disturb_active() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    state.select_tab(TaskType::Running);
    state.take_outbox();

    deliver(&router, &mut state, "taskListLoaded", page("archived", &["z1"], 0, 1));

    assert_eq!(state.board.active(), TaskType::Running);
    assert_eq!(state.board.current().phase, ListPhase::Loading);
    assert_eq!(state.board.tab(TaskType::Archived).rows.len(), 1);
}

// === Task Action Tests ===

#[test]
fn test_cleanup_removes_row_locally() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    deliver(&router, &mut state, "taskListLoaded", page("wip", &["a", "b"], 0, 2));

    assert!(state.request_cleanup());
    assert_eq!(sent(&mut state), vec!["cleanupTask"]);

    deliver(
        &router,
        &mut state,
        "taskActionResult",
        json!({"result": {"success": true, "taskId": "a"}, "action": "cleanup"}),
    );

    assert!(sent(&mut state).is_empty());
    let current = state.board.current();
    assert_eq!(current.rows.len(), 1);
    assert_eq!(current.pagination.total_count, 1);
    assert!(state.banner.as_ref().unwrap().success);
}

#[test]
fn test_delete_success_reloads_active_tab() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    deliver(&router, &mut state, "taskListLoaded", page("wip", &["a"], 0, 1));

    let task = state.board.current().selected_task().cloned().unwrap();
    assert!(state.request_delete(&task));
    assert_eq!(sent(&mut state), vec!["deleteTask"]);

    deliver(
        &router,
        &mut state,
        "taskActionResult",
        json!({"result": {"success": true}, "action": "delete", "taskId": "a"}),
    );
    assert_eq!(sent(&mut state), vec!["retrieveWipTasks"]);
}

#[test]
fn test_failed_action_keeps_rows_and_shows_error() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    deliver(&router, &mut state, "taskListLoaded", page("wip", &["a"], 0, 1));

    deliver(
        &router,
        &mut state,
        "taskActionResult",
        json!({"result": {"success": false, "error": "locked"}, "action": "cleanup", "taskId": "a"}),
    );

    assert_eq!(state.board.current().rows.len(), 1);
    let banner = state.banner.as_ref().unwrap();
    assert!(!banner.success);
    assert_eq!(banner.error.as_deref(), Some("locked"));
}

#[test]
fn test_restore_flow_empties_archived_tab() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    state.select_tab(TaskType::Archived);
    state.take_outbox();
    deliver(&router, &mut state, "taskListLoaded", page("archived", &["z1"], 0, 1));

    assert!(state.request_restore());
    assert_eq!(sent(&mut state), vec!["restoreTask"]);

    deliver(&router, &mut state, "taskRestored", json!({"taskId": "z1"}));
    let view = state.board.view();
    assert!(view.show_empty);
    assert_eq!(view.empty_message, "No archived tasks found.");
}

// === Edit Modal Tests ===

#[test]
fn test_edit_round_trip() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    deliver(&router, &mut state, "taskListLoaded", page("wip", &["a"], 0, 1));

    assert!(state.request_edit());
    assert_eq!(sent(&mut state), vec!["editTask"]);

    deliver(
        &router,
        &mut state,
        "showTaskEditForm",
        json!({"Id": "a", "Name": "Task a", "Status__c": "In Progress", "Estimated_Effort_Hours__c": 2.0}),
    );
    {
        let form = state.modal.edit_form_mut().unwrap();
        form.estimated_effort = "2".to_string();
        form.estimation_unit = sdd_hub::hub::estimation::EstimationUnit::Days;
    }

    state.save_edit();
    let out = state.take_outbox();
    match out.as_slice() {
        [OutboundMessage::SaveTaskUpdates { task_id, updates }] => {
            assert_eq!(task_id, "a");
            assert_eq!(updates.get("Estimated_Effort_Hours__c"), Some(&json!(16.0)));
        }
        other => panic!("unexpected outbox: {:?}", other),
    }
    assert!(state.modal.is_hidden());

    deliver(
        &router,
        &mut state,
        "taskActionResult",
        json!({"result": {"success": true, "taskId": "a"}, "action": "update"}),
    );
    assert_eq!(sent(&mut state), vec!["retrieveWipTasks"]);
}

#[test]
fn test_edit_form_without_id_stays_hidden() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    deliver(&router, &mut state, "showTaskEditForm", json!({"Name": "orphan"}));
    assert!(state.modal.is_hidden());
}

// === Connection / Dropdown Tests ===

#[test]
fn test_connect_loads_dropdowns_once() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();

    deliver(&router, &mut state, "updateAWSStatus", json!({"status": "connected", "connected": true}));
    assert_eq!(sent(&mut state), vec!["loadInitiatives", "loadEpics"]);

    deliver(&router, &mut state, "awsStatusResponse", json!({"status": "connected", "connected": true}));
    assert!(sent(&mut state).is_empty());

    deliver(
        &router,
        &mut state,
        "initiativesLoaded",
        json!({"initiatives": [{"id": "i1", "name": "Platform"}]}),
    );
    deliver(
        &router,
        &mut state,
        "epicsLoaded",
        json!({"epics": [{"id": "e1", "name": "Login", "teamName": "Core"}]}),
    );
    assert_eq!(state.dropdowns.epic_options()[0].label, "Login (Core)");

    deliver(&router, &mut state, "updateAWSStatus", json!({"status": "disconnected", "connected": false}));
    assert!(state.dropdowns.epic_options().iter().all(|o| o.disabled));
}

#[test]
fn test_epoch_millis_expiry_still_connects() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();

    deliver(
        &router,
        &mut state,
        "updateAWSStatus",
        json!({"status": "connected", "connected": true, "sessionExpiry": 1_792_400_000_000i64}),
    );

    assert!(state.aws.connected);
    assert!(state.aws.session_expiry.is_some());
    assert_eq!(sent(&mut state), vec!["loadInitiatives", "loadEpics"]);
}

// === Feedback Tests ===

#[test]
fn test_feedback_round_trip() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();
    state.feedback.message = "Works well".to_string();
    state.submit_feedback();
    assert_eq!(sent(&mut state), vec!["submitFeedback"]);
    assert!(state.feedback.submitting);

    deliver(&router, &mut state, "feedbackResult", json!({"success": true, "message": "Thanks!"}));
    assert!(!state.feedback.submitting);
    assert!(state.feedback.message.is_empty());
}

// === Error Tests ===

#[test]
fn test_unknown_and_malformed_messages() {
    let router = Router::standard().unwrap();
    let mut state = HubState::new();

    let unknown = router.dispatch(&mut state, Envelope::new("reticulateSplines", None));
    assert!(matches!(unknown, Err(HubError::UnknownCommand(_))));

    let malformed = router.dispatch(
        &mut state,
        Envelope::new("taskListLoaded", Some(json!({"tasks": "nope"}))),
    );
    assert!(matches!(malformed, Err(HubError::MalformedPayload { .. })));
    assert_eq!(state.board.current().phase, ListPhase::Idle);
}

#[test]
fn test_envelope_line_format() {
    let line = OutboundMessage::GetAwsStatus.to_envelope().unwrap().to_line().unwrap();
    assert_eq!(line, r#"{"command":"getAWSStatus"}"#);

    let parsed = Envelope::from_line(r#"{"command":"taskRestored","data":{"taskId":"x"}}"#).unwrap();
    assert_eq!(parsed.command, "taskRestored");
    assert_eq!(parsed.data, Some(json!({"taskId": "x"})));
}
