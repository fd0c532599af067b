use crate::prelude::*;

use std::rc::Rc;

use crate::{
    components::{
        haptic_button::HapticButton,
        svg::{DrawSvg, Refresh},
    },
    dependency_loader::prelude::*,
    utils::CCStr,
    Route,
};

pub mod cart;
pub mod main_layout;
pub mod product;
pub mod product_list;
pub mod user;

#[component]
fn TitledView(title: CCStr, subtitle: Option<CCStr>, right: Option<Element>, children: Element) -> Element {
    rsx! {
        div { class: "titled-view",
            div { class: "titled-view-header",
                div {
                    h1 { {title} }
                    if let Some(subtitle) = subtitle {
                        h2 { {subtitle} }
                    }
                }
                {right}
            }
            {children}
        }
    }
}

/// Reload the screen dependencies each time the screen becomes visible
/// again.
///
/// The announcement of the screen own mount is absorbed by the
/// [VisibilityReloader]: the loader already ran its implicit load.
fn use_reload_on_screen_visible(handle: LoaderHandle) {
    let route = use_route::<Route>().to_string();
    let reloader = use_hook(|| Rc::new(VisibilityReloader::new(handle)));
    reloader.set_route(route);

    use_event_subscription(move |event: ScreenVisibleEvent| {
        reloader.on_visible(&event.route);
    });
}

/// Reload button offered by the failed views
#[component]
fn RetryButton(handle: LoaderHandle) -> Element {
    rsx! {
        HapticButton { class: "btn-primary", onclick: move |_| handle.load(true),
            DrawSvg::<Refresh> {}
            "Try again"
        }
    }
}
