#![windows_subsystem = "windows"]
mod components;
mod dependency_loader;
mod model;
mod state_management;
mod utils;
mod views;

mod prelude {
    pub use super::components::alerts::{alert_error, alert_info, alert_success};
    pub use super::state_management::prelude::*;
    pub use dioxus::prelude::*;
}

use components::alerts::AlertsContainer;
use prelude::*;

use views::{
    cart::CartView, main_layout::MainLayout, product::ProductView,
    product_list::ProductListView, user::UserView,
};

#[derive(Clone, Routable, Debug, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Route {
    #[layout(MainLayout)]
        #[route("/")]
        ProductListView {},
        #[route("/product/:product_id")]
        ProductView { product_id: String },
        #[route("/cart")]
        CartView {},
        #[route("/account")]
        UserView {},
    #[end_layout]
    #[route("/:..route")]
    PageNotFound { route: Vec<String> },
}

static TITLE: &str = "Storefront";

#[allow(non_snake_case)]
fn App() -> Element {
    log::debug!("App reload");

    crate::state_management::use_init_services();

    use_drop(|| log::debug!("App Dropped"));

    rsx! {
        document::Title { "{TITLE}" }
        document::Stylesheet { href: asset!("/assets/main.css") }

        div {
            id: "app",
            "data-theme": prelude::state_management::THEME().data_theme(),
            AlertsContainer {}
            Router::<Route> {}
        }
    }
}

#[component]
fn PageNotFound(route: Vec<String>) -> Element {
    rsx! {
        h1 { "Page not found" }
        p { "We are terribly sorry, but the page you requested doesn't exist." }
        pre { class: "text-error", "log:\nattemped to navigate to: {route:?}" }
        Link { class: "btn btn-primary", to: Route::ProductListView {}, "Back to the products" }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    log::info!("starting app");

    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
        LaunchBuilder::desktop()
            .with_cfg(
                Config::new().with_menu(None).with_window(
                    WindowBuilder::new()
                        .with_title(TITLE)
                        .with_inner_size(LogicalSize::new(480, 900))
                        .with_resizable(true),
                ),
            )
            .launch(App)
    }
    #[cfg(not(feature = "desktop"))]
    dioxus::launch(App)
}
