//! Chat rows: one per message, classified before rendering.
//!
//! SYSTEM CONTEXT
//! ==============
//! `MessageList` keys rows by message index so a history refresh updates
//! rows in place. Each row memoizes its prepared body and renders by body
//! kind, so a pane layout keeps its `AgentTabs` (and the user's tab pin)
//! while its outputs change underneath it.

#[cfg(test)]
#[path = "chat_content_test.rs"]
mod chat_content_test;

use leptos::prelude::*;
use leptos::tachys::view::any_view::IntoAny;
use views::{AgentOutput, MessageBody, PreparedText, RenderOptions, TemplateIntro, prepare_message, render_prepared_html};

use crate::components::agent_tabs::AgentTabs;
use crate::components::plan_list::PlanList;
use crate::state::chat::ChatState;

/// Which layout a row uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BodyKind {
    User,
    Markdown,
    Panes,
    Template,
}

impl BodyKind {
    pub(crate) fn of(body: &MessageBody) -> Self {
        match body {
            MessageBody::UserText(_) => Self::User,
            MessageBody::Markdown(_) => Self::Markdown,
            MessageBody::Panes(_) => Self::Panes,
            MessageBody::Template(_) => Self::Template,
        }
    }
}

/// All messages of the current conversation.
#[component]
pub fn MessageList() -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    let count = Memo::new(move |_| chat.with(|c| c.messages.len()));

    view! {
        <div class="message-list">
            <For
                each=move || 0..count.get()
                key=|index| *index
                children=move |index| view! { <ChatContent index=index /> }
            />
        </div>
    }
}

/// A single message row.
#[component]
pub fn ChatContent(index: usize) -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();

    let body = Memo::new(move |_| {
        chat.with(|c| c.messages.get(index).map(|m| prepare_message(m, &c.options)))
    });
    let kind = Memo::new(move |_| body.with(|b| b.as_ref().map(BodyKind::of)));
    let model = Memo::new(move |_| {
        chat.with(|c| c.messages.get(index).and_then(|m| model_badge(m.model_name.as_deref())))
    });
    let thinking = Memo::new(move |_| chat.with(|c| c.messages.get(index).is_some_and(|m| m.thinking)));

    move || match kind.get() {
        None => ().into_any(),
        Some(BodyKind::User) => {
            let text = move || match body.get() {
                Some(MessageBody::UserText(text)) => text,
                _ => String::new(),
            };
            view! {
                <div class="chat-row chat-row--user">
                    <div class="chat-row__bubble">{text}</div>
                </div>
            }
            .into_any()
        }
        Some(BodyKind::Template) => {
            let intro = move || match body.get() {
                Some(MessageBody::Template(intro)) => intro,
                _ => TemplateIntro::default(),
            };
            view! {
                <div class="chat-row chat-row--view">
                    <div class="template-intro">
                        <h3 class="template-intro__name">{move || intro().template_name}</h3>
                        <p class="template-intro__text">{move || intro().template_introduce}</p>
                    </div>
                </div>
            }
            .into_any()
        }
        Some(BodyKind::Markdown) => {
            let prepared = Memo::new(move |_| match body.get() {
                Some(MessageBody::Markdown(prepared)) => prepared,
                _ => PreparedText::default(),
            });
            view! {
                <div class="chat-row chat-row--view">
                    <ModelBadge model=model />
                    <PreparedMarkdown prepared=prepared />
                    <RelationChips prepared=prepared />
                    <ThinkingIndicator thinking=thinking />
                </div>
            }
            .into_any()
        }
        Some(BodyKind::Panes) => {
            let left = Memo::new(move |_| match body.get() {
                Some(MessageBody::Panes(panes)) => panes.left,
                _ => PreparedText::default(),
            });
            let right = Memo::new(move |_| match body.get() {
                Some(MessageBody::Panes(panes)) => panes.right,
                _ => Vec::<AgentOutput>::new(),
            });
            view! {
                <div class="chat-row chat-row--view">
                    <ModelBadge model=model />
                    <div class="panes">
                        <div class="panes__left">
                            <PreparedMarkdown prepared=left />
                            <PlanList outputs=right />
                            <RelationChips prepared=left />
                        </div>
                        <div class="panes__right">
                            <AgentTabs outputs=right />
                        </div>
                    </div>
                    <ThinkingIndicator thinking=thinking />
                </div>
            }
            .into_any()
        }
    }
}

#[component]
fn PreparedMarkdown(prepared: Memo<PreparedText>) -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    let html = move || {
        let options = chat.with(|c| c.options.clone());
        prepared.with(|p| markdown_html(p, &options))
    };
    view! { <div class="markdown" inner_html=html></div> }
}

#[component]
fn RelationChips(prepared: Memo<PreparedText>) -> impl IntoView {
    view! {
        <Show when=move || prepared.with(|p| !p.relations.is_empty())>
            <div class="relations">
                {move || {
                    prepared
                        .get()
                        .relations
                        .into_iter()
                        .map(|relation| view! { <span class="relations__chip">{relation}</span> })
                        .collect_view()
                }}
            </div>
        </Show>
    }
}

#[component]
fn ModelBadge(model: Memo<Option<String>>) -> impl IntoView {
    move || model.get().map(|name| view! { <span class="model-badge">{name}</span> })
}

#[component]
fn ThinkingIndicator(thinking: Memo<bool>) -> impl IntoView {
    view! {
        <Show when=move || thinking.get()>
            <div class="thinking" aria-live="polite">
                <span class="thinking__dot"></span>
                <span class="thinking__dot"></span>
                <span class="thinking__dot"></span>
            </div>
        </Show>
    }
}

fn markdown_html(prepared: &PreparedText, options: &RenderOptions) -> String {
    if prepared.text.trim().is_empty() {
        return String::new();
    }
    render_prepared_html(prepared, options)
}

/// Trimmed model name, hidden when blank.
pub(crate) fn model_badge(model_name: Option<&str>) -> Option<String> {
    model_name.map(str::trim).filter(|name| !name.is_empty()).map(str::to_owned)
}
