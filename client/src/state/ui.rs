//! Local UI chrome state (theme, cross-component task selection).
//!
//! DESIGN
//! ======
//! Keeps transient presentation concerns out of the chat data so rendering
//! controls can evolve independently of backend payloads.
//!
//! Task selection is a sequence-numbered request rather than an event
//! emitter: any component may call [`UiState::request_task_select`], and
//! every mounted `AgentTabs` observes the bump through an `Effect` that is
//! disposed with the component.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

/// UI state for theme and task-selection requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub dark_mode: bool,
    /// Bumped on every task-selection request, including repeats of the same
    /// task id.
    pub task_select_seq: u64,
    /// Task id of the latest request.
    pub task_select: Option<String>,
}

impl UiState {
    /// Ask every agent tab strip to select `task_id`.
    pub fn request_task_select(&mut self, task_id: impl Into<String>) {
        self.task_select = Some(task_id.into());
        self.task_select_seq = self.task_select_seq.wrapping_add(1);
    }

    /// The request newer than `seen_seq`, if any.
    #[must_use]
    pub fn pending_task_select(&self, seen_seq: u64) -> Option<&str> {
        if self.task_select_seq == seen_seq {
            return None;
        }
        self.task_select.as_deref()
    }
}
