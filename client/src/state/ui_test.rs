use super::*;

// =============================================================
// UiState defaults
// =============================================================

#[test]
fn ui_state_default_has_no_task_request() {
    let state = UiState::default();
    assert!(!state.dark_mode);
    assert_eq!(state.task_select_seq, 0);
    assert!(state.task_select.is_none());
    assert!(state.pending_task_select(0).is_none());
}

// =============================================================
// Task selection requests
// =============================================================

#[test]
fn request_task_select_bumps_sequence() {
    let mut state = UiState::default();
    state.request_task_select("t1");
    assert_eq!(state.task_select_seq, 1);
    assert_eq!(state.pending_task_select(0), Some("t1"));
    assert!(state.pending_task_select(1).is_none());
}

#[test]
fn repeated_request_for_same_task_is_still_new() {
    let mut state = UiState::default();
    state.request_task_select("t1");
    let seen = state.task_select_seq;
    state.request_task_select("t1");
    assert_eq!(state.pending_task_select(seen), Some("t1"));
}

#[test]
fn latest_request_wins() {
    let mut state = UiState::default();
    state.request_task_select("t1");
    state.request_task_select("t2");
    assert_eq!(state.pending_task_select(0), Some("t2"));
}
