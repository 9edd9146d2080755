//! Shared application state.
//!
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! relay is stateless, so this only carries the configured history client
//! and the render options handed to browsers.

use views::RenderOptions;

use crate::upstream::HistoryClient;

#[derive(Clone, Debug)]
pub struct AppState {
    pub history: HistoryClient,
    pub render: RenderOptions,
}

impl AppState {
    #[must_use]
    pub fn new(history: HistoryClient, render: RenderOptions) -> Self {
        Self { history, render }
    }
}
