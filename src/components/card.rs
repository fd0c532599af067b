use crate::prelude::*;

/// Rounded, raised surface grouping related content
#[component]
pub fn Card(#[props(default)] class: &'static str, children: Element) -> Element {
    rsx! {
        div { class: "card {class}", {children} }
    }
}
