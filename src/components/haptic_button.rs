use crate::prelude::*;

/// Trigger a short haptic impact. Only mobile webviews can vibrate.
fn haptic_impact() {
    #[cfg(feature = "mobile")]
    {
        document::eval("if (navigator.vibrate) { navigator.vibrate(15); }");
    }
    #[cfg(not(feature = "mobile"))]
    log::trace!("haptic_impact - not supported on this platform");
}

/// Button giving haptic feedback before running its click handler
#[component]
pub fn HapticButton(
    #[props(default)] class: &'static str,
    #[props(default = false)] disabled: bool,
    onclick: EventHandler<MouseEvent>,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "btn {class}",
            disabled,
            onclick: move |event| {
                haptic_impact();
                onclick.call(event);
            },
            {children}
        }
    }
}
