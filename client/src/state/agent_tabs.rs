//! Tab selection for per-agent output: auto-follow vs user pin.
//!
//! DESIGN
//! ======
//! Tabs are derived from the agent-output sequence and keyed by `task_id`;
//! only the selection is stored. While the user is not driving, the active
//! tab follows the newest output. Picking an older tab pins it; picking the
//! newest tab resumes following. Clicks from outside the strip go through
//! [`AgentTabsState::select`] exactly like tab clicks.

#[cfg(test)]
#[path = "agent_tabs_test.rs"]
mod agent_tabs_test;

use views::AgentOutput;

/// Selection state for one tab strip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentTabsState {
    active: Option<String>,
    user_driving: bool,
}

impl AgentTabsState {
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// `true` while a user selection is pinned.
    #[must_use]
    pub fn is_user_driving(&self) -> bool {
        self.user_driving
    }

    /// New data arrived.
    ///
    /// Snaps to the newest output unless the user pinned a tab that still
    /// exists; a pin on a vanished tab is dropped.
    pub fn sync(&mut self, outputs: &[AgentOutput]) {
        if self.user_driving {
            let pinned_exists = self
                .active
                .as_deref()
                .is_some_and(|key| outputs.iter().any(|o| o.task_id == key));
            if pinned_exists {
                return;
            }
            self.user_driving = false;
        }
        self.active = latest_key(outputs).map(str::to_owned);
    }

    /// Explicit selection, from the tab strip or an external task reference.
    ///
    /// Returns `false` (and changes nothing) when `key` is not one of the
    /// outputs; task references from other messages land here.
    pub fn select(&mut self, key: &str, outputs: &[AgentOutput]) -> bool {
        if !outputs.iter().any(|o| o.task_id == key) {
            return false;
        }
        self.user_driving = latest_key(outputs) != Some(key);
        self.active = Some(key.to_owned());
        true
    }

    /// The output behind the active tab.
    #[must_use]
    pub fn active_output<'a>(&self, outputs: &'a [AgentOutput]) -> Option<&'a AgentOutput> {
        let key = self.active.as_deref()?;
        outputs.iter().find(|o| o.task_id == key)
    }
}

fn latest_key(outputs: &[AgentOutput]) -> Option<&str> {
    outputs.last().map(|o| o.task_id.as_str())
}
