//! Dark mode preference and toggle.
//!
//! Reads the preference from `localStorage` and sets a `data-theme`
//! attribute on the `<html>` element. Requires a browser environment; SSR
//! paths no-op.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

#[cfg(feature = "hydrate")]
const STORAGE_KEY: &str = "riskview_dark";

/// Stored preference, falling back to the system color scheme.
pub fn read_preference() -> bool {
    #[cfg(feature = "hydrate")]
    {
        let Some(window) = web_sys::window() else {
            return false;
        };

        if let Ok(Some(storage)) = window.local_storage()
            && let Ok(Some(val)) = storage.get_item(STORAGE_KEY)
        {
            return val == "true";
        }

        matches!(
            window.match_media("(prefers-color-scheme: dark)"),
            Ok(Some(mq)) if mq.matches()
        )
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Apply the `data-theme` attribute on the `<html>` element.
pub fn apply(enabled: bool) {
    #[cfg(feature = "hydrate")]
    {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.document_element());
        if let Some(el) = root
            && let Err(err) = el.set_attribute("data-theme", theme_name(enabled))
        {
            log::warn!("failed to set theme attribute: {err:?}");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = theme_name(enabled);
    }
}

/// Toggle dark mode and persist the new preference.
pub fn toggle(current: bool) -> bool {
    let next = !current;
    apply(next);
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window()
            && let Ok(Some(storage)) = window.local_storage()
            && storage.set_item(STORAGE_KEY, if next { "true" } else { "false" }).is_err()
        {
            log::warn!("failed to persist theme preference");
        }
    }
    next
}

fn theme_name(enabled: bool) -> &'static str {
    if enabled { "dark" } else { "light" }
}
