mod backend;
mod cart;
mod catalog;
mod event_bus;
mod navigation;
mod store;
mod theme;
mod user;

pub fn use_init_services() {
    log::debug!("init_services - start");
    let event_bus_service = event_bus::use_event_bus_service();
    let backend_service = backend::use_backend_service(event_bus_service);
    let _ = catalog::use_catalog_service(backend_service);
    let _ = cart::use_cart_service(backend_service);
    let _ = user::use_user_service(backend_service);
    let _ = theme::use_theme_service(event_bus_service, backend_service);
    log::debug!("init_services - finished");
}

pub mod prelude {
    pub use super::event_bus::use_event_subscription;
    pub use super::navigation::{use_screen_visibility_publisher, ScreenVisibleEvent};
    pub use super::store::use_store;
    pub use super::theme::Darkmode;

    pub mod state_management {
        pub use super::super::backend::APPLICATION_CONFIG;
        pub use super::super::cart::CART;
        pub use super::super::catalog::{find_product, PRODUCTS};
        pub use super::super::theme::THEME;
        pub use super::super::user::USER_DATA;
    }
}
