//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::chat::ChatPage;
use crate::state::{chat::ChatState, ui::UiState};
use crate::util::dark_mode;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the chat and UI state contexts and sets up client-side routing.
/// Both contexts live as long as the app, so components that subscribe to
/// them through effects are cleaned up with their own owners.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let chat = RwSignal::new(ChatState::default());
    let ui = RwSignal::new(UiState {
        dark_mode: dark_mode::read_preference(),
        ..UiState::default()
    });

    provide_context(chat);
    provide_context(ui);

    Effect::new(move || dark_mode::apply(ui.get().dark_mode));

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_render_options().await {
            Ok(options) => chat.update(|c| c.options = options),
            Err(err) => log::warn!("render options unavailable, using defaults: {err}"),
        }
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/riskview.css"/>
        <Title text="Risk Intelligence"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=ChatPage/>
                <Route path=(StaticSegment("chat"), ParamSegment("conv_id")) view=ChatPage/>
            </Routes>
        </Router>
    }
}
