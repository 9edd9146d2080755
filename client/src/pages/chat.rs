//! Conversation page: loads history and renders the message list.
//!
//! SYSTEM CONTEXT
//! ==============
//! Serves both `/` (no conversation selected) and `/chat/:conv_id`. History
//! is fetched when the route parameter changes and re-polled while the
//! newest message is still thinking. The poll loop stops on unmount.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::chat_content::MessageList;
#[cfg(feature = "hydrate")]
use crate::net::api::fetch_messages;
use crate::state::chat::ChatState;
use crate::state::ui::UiState;
use crate::util::dark_mode;

#[cfg(feature = "hydrate")]
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(3);

/// Chat page for the conversation named in the route, if any.
#[component]
pub fn ChatPage() -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let params = use_params_map();
    let conv_id = Memo::new(move |_| params.with(|p| normalize_conv_id(p.get("conv_id").as_deref())));

    Effect::new(move || {
        let Some(id) = conv_id.get() else { return };
        if let Some(request) = chat.try_update(|c| c.begin_load(&id)) {
            load_history(chat, id, request);
        }
    });

    #[cfg(feature = "hydrate")]
    {
        let poll_alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let poll_alive_task = poll_alive.clone();
        leptos::task::spawn_local(async move {
            loop {
                gloo_timers::future::sleep(POLL_INTERVAL).await;
                if !poll_alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                if !chat.with_untracked(ChatState::is_thinking) {
                    continue;
                }
                // Skips the tick while any earlier request is still out.
                if let Some((id, request)) = chat.try_update(ChatState::begin_refresh).flatten() {
                    load_history(chat, id, request);
                }
            }
        });
        on_cleanup(move || poll_alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }

    let on_toggle_theme = move |_| ui.update(|u| u.dark_mode = dark_mode::toggle(u.dark_mode));
    let theme_label = move || theme_toggle_label(ui.with(|u| u.dark_mode));
    let error = move || chat.with(|c| c.error.clone());
    let loading = move || chat.with(|c| c.loading && c.messages.is_empty());

    view! {
        <div class="chat-page">
            <header class="chat-page__header">
                <h1 class="chat-page__title">"Risk Intelligence"</h1>
                <button class="chat-page__theme" on:click=on_toggle_theme>{theme_label}</button>
            </header>
            <main class="chat-page__body">
                <Show
                    when=move || conv_id.with(Option::is_some)
                    fallback=|| view! { <p class="chat-page__empty">"Select a conversation to view its analysis."</p> }
                >
                    <Show when=loading>
                        <p class="chat-page__loading">"Loading conversation..."</p>
                    </Show>
                    {move || error().map(|message| view! { <p class="chat-page__error">{message}</p> })}
                    <MessageList />
                </Show>
            </main>
        </div>
    }
}

/// Fetch history for `conv_id` and store it unless `request` was superseded.
fn load_history(chat: RwSignal<ChatState>, conv_id: String, request: u64) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let result = fetch_messages(&conv_id).await;
        chat.update(|c| {
            let applied = match result {
                Ok(messages) => c.apply_history(request, messages),
                Err(message) => c.apply_error(request, message),
            };
            if !applied {
                log::debug!("dropped superseded history response for {conv_id}");
            }
        });
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (chat, conv_id, request);
    }
}

fn normalize_conv_id(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|id| !id.is_empty()).map(str::to_owned)
}

fn theme_toggle_label(dark_mode: bool) -> &'static str {
    if dark_mode { "Light mode" } else { "Dark mode" }
}
