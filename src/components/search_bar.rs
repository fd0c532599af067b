use crate::prelude::*;

use crate::components::{
    card::Card,
    svg::{Close, DrawSvg, Magnify, SvgSize::Size5},
};

/// Placeholder / editing state of a [SearchBar]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    searching: bool,
    text: String,
}
impl SearchState {
    pub fn is_searching(&self) -> bool {
        self.searching
    }
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Leave the placeholder for the text input
    pub fn begin(&mut self) {
        self.searching = true;
    }
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
    /// Clear the text and go back to the placeholder
    pub fn cancel(&mut self) {
        self.text.clear();
        self.searching = false;
    }
    /// The query to run, if the text is not blank
    pub fn submit(&self) -> Option<String> {
        let query = self.text.trim();
        (!query.is_empty()).then(|| query.to_owned())
    }
    /// The input lost focus: a blank search is cancelled.
    ///
    /// Returns `true` if the search was cancelled.
    pub fn on_blur(&mut self) -> bool {
        if self.searching && self.text.trim().is_empty() {
            self.cancel();
            true
        } else {
            false
        }
    }
}

#[component]
pub fn SearchBar(
    on_submit: EventHandler<String>,
    on_cancel: Option<EventHandler<()>>,
) -> Element {
    let mut search = use_signal(SearchState::default);

    let mut cancel = move || {
        search.write().cancel();
        if let Some(on_cancel) = on_cancel {
            on_cancel.call(());
        }
    };

    let text = search.read().text().to_owned();
    rsx! {
        Card { class: "search-bar",
            if search.read().is_searching() {
                form {
                    class: "search-input",
                    onsubmit: move |event| {
                        event.prevent_default();
                        if let Some(query) = search.read().submit() {
                            on_submit.call(query);
                        }
                    },
                    input {
                        r#type: "search",
                        autofocus: true,
                        value: "{text}",
                        oninput: move |event| search.write().set_text(event.value()),
                        onblur: move |_| {
                            if search.write().on_blur() {
                                if let Some(on_cancel) = on_cancel {
                                    on_cancel.call(());
                                }
                            }
                        },
                    }
                    button {
                        r#type: "button",
                        class: "btn btn-circle btn-xs",
                        onclick: move |_| cancel(),
                        DrawSvg::<Close> { size: Size5 }
                    }
                }
            } else {
                div {
                    class: "search-placeholder",
                    onclick: move |_| search.write().begin(),
                    DrawSvg::<Magnify> { size: Size5 }
                    span { "Search ..." }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_placeholder() {
        let state = SearchState::default();
        assert!(!state.is_searching());
        assert_eq!(state.text(), "");
    }

    #[test]
    fn submit_returns_the_trimmed_query() {
        let mut state = SearchState::default();
        state.begin();
        state.set_text("  oak table ");
        assert_eq!(state.submit().as_deref(), Some("oak table"));
        assert!(state.is_searching());
    }

    #[test]
    fn blank_text_is_never_submitted() {
        let mut state = SearchState::default();
        state.begin();
        assert_eq!(state.submit(), None);
        state.set_text("   ");
        assert_eq!(state.submit(), None);
    }

    #[test]
    fn cancel_clears_and_returns_to_the_placeholder() {
        let mut state = SearchState::default();
        state.begin();
        state.set_text("lamp");
        state.cancel();
        assert_eq!(state, SearchState::default());
    }

    #[test]
    fn blur_only_cancels_a_blank_search() {
        let mut state = SearchState::default();
        state.begin();
        state.set_text("lamp");
        assert!(!state.on_blur());
        assert!(state.is_searching());

        state.set_text("  ");
        assert!(state.on_blur());
        assert!(!state.is_searching());
        assert_eq!(state.text(), "");

        // Nothing to cancel on the placeholder
        assert!(!state.on_blur());
    }
}
