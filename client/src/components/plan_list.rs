//! Execution plan list for a pane layout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sits under the overview markdown and mirrors the agent tab strip. Clicking
//! an entry asks every mounted tab strip to select that task.

#[cfg(test)]
#[path = "plan_list_test.rs"]
mod plan_list_test;

use leptos::prelude::*;
use views::{AgentOutput, status_style};

use crate::state::ui::UiState;

/// One row per agent output, styled by status.
#[component]
pub fn PlanList(#[prop(into)] outputs: Signal<Vec<AgentOutput>>) -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();

    view! {
        <ul class="plan-list">
            {move || {
                outputs
                    .get()
                    .into_iter()
                    .map(|output| {
                        let style = status_style(output.status);
                        let task_id = output.task_id.clone();
                        let on_click = move |_| {
                            let task_id = task_id.clone();
                            ui.update(|u| u.request_task_select(task_id));
                        };
                        let icon = style.icon.map(|icon| icon.svg()).unwrap_or_default();
                        view! {
                            <li class="plan-list__item">
                                <button class="plan-list__button" on:click=on_click>
                                    <span class=status_chip_class(style.bg_class) inner_html=icon></span>
                                    <span class="plan-list__label">{plan_label(&output)}</span>
                                    {output
                                        .agent
                                        .clone()
                                        .map(|agent| view! { <span class="plan-list__agent">{agent}</span> })}
                                </button>
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>
    }
}

fn status_chip_class(bg_class: &str) -> String {
    if bg_class.is_empty() {
        "plan-list__status".to_owned()
    } else {
        format!("plan-list__status {bg_class}")
    }
}

/// `"{num}. {name}"` when the backend numbered the step.
pub(crate) fn plan_label(output: &AgentOutput) -> String {
    match output.num {
        Some(num) => format!("{num}. {}", output.name),
        None => output.name.clone(),
    }
}
