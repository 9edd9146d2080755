//! Tabbed view over per-agent outputs.
//!
//! SYSTEM CONTEXT
//! ==============
//! Right-hand pane of a pane layout. Selection lives in a component-local
//! [`AgentTabsState`]; new data re-syncs it, tab clicks and plan-list task
//! requests go through the same `select`. The request observer is an
//! `Effect` owned by this component, so it is dropped on unmount.

#[cfg(test)]
#[path = "agent_tabs_test.rs"]
mod agent_tabs_test;

use leptos::prelude::*;
use views::{AgentOutput, RenderOptions, prepare_text, render_prepared_html, status_style};

use crate::components::plan_list::plan_label;
use crate::state::agent_tabs::AgentTabsState;
use crate::state::chat::ChatState;
use crate::state::ui::UiState;

/// Tab strip plus the active agent's rendered markdown.
#[component]
pub fn AgentTabs(#[prop(into)] outputs: Signal<Vec<AgentOutput>>) -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let tabs = RwSignal::new(AgentTabsState::default());

    Effect::new(move || {
        outputs.with(|list| tabs.update(|t| t.sync(list)));
    });

    // Requests issued before mount belong to someone else.
    let seen_seq = StoredValue::new(ui.with_untracked(|u| u.task_select_seq));
    Effect::new(move || {
        ui.with(|u| {
            if let Some(task_id) = u.pending_task_select(seen_seq.get_value()) {
                outputs.with_untracked(|list| {
                    tabs.update(|t| {
                        t.select(task_id, list);
                    });
                });
            }
            seen_seq.set_value(u.task_select_seq);
        });
    });

    let active_html = Memo::new(move |_| {
        let options = chat.with(|c| c.options.clone());
        tabs.with(|t| outputs.with(|list| t.active_output(list).map(|o| output_html(o, &options))))
    });

    view! {
        <div class="agent-tabs">
            <div class="agent-tabs__strip" role="tablist">
                {move || {
                    outputs
                        .get()
                        .into_iter()
                        .map(|output| {
                            let key = output.task_id.clone();
                            let key_click = key.clone();
                            let is_active = Signal::derive(move || tabs.with(|t| t.active() == Some(key.as_str())));
                            let on_click = move |_| {
                                outputs.with_untracked(|list| {
                                    tabs.update(|t| {
                                        t.select(&key_click, list);
                                    });
                                });
                            };
                            let style = status_style(output.status);
                            let icon = style.icon.map(|icon| icon.svg()).unwrap_or_default();
                            view! {
                                <button
                                    class=move || tab_class(is_active.get())
                                    role="tab"
                                    aria-selected=move || is_active.get().to_string()
                                    on:click=on_click
                                >
                                    {output
                                        .avatar
                                        .clone()
                                        .map(|src| view! { <img class="agent-tabs__avatar" src=src alt="" /> })}
                                    <span class="agent-tabs__label">{plan_label(&output)}</span>
                                    <span class=format!("agent-tabs__status {}", style.bg_class) inner_html=icon></span>
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <Show
                when=move || active_html.with(Option::is_some)
                fallback=|| view! { <div class="agent-tabs__empty">"No agent output yet"</div> }
            >
                <div class="agent-tabs__body markdown" role="tabpanel" inner_html=move || active_html.get().unwrap_or_default()></div>
            </Show>
        </div>
    }
}

fn tab_class(active: bool) -> &'static str {
    if active { "agent-tabs__tab agent-tabs__tab--active" } else { "agent-tabs__tab" }
}

/// Agent markdown may carry embedded views of its own.
pub(crate) fn output_html(output: &AgentOutput, options: &RenderOptions) -> String {
    render_prepared_html(&prepare_text(&output.markdown, options), options)
}
