//! # Dependency Loader
//!
//! Gates the content of a screen behind the resolution of the asynchronous
//! operations it depends on.
//!
//! - [`DependencyLoader`](loader::DependencyLoader): the state machine. It runs
//!   its dependency set once on creation, then again each time its
//!   [`LoaderHandle`](loader::LoaderHandle) is invoked. Overlapping runs are
//!   resolved by [`RunToken`](state::RunToken) order: a superseded run never
//!   overwrites the state written by a newer one.
//! - [`VisibilityGate`](visibility::VisibilityGate): the host screen's
//!   "has been visible before" flag, which swallows the visibility
//!   notification announcing the initial mount.
//!   [`VisibilityReloader`](visibility::VisibilityReloader) pairs it with the
//!   screen's route and reloads the loader on later notifications.
//! - [`use_dependency_loader`](component::use_dependency_loader) and
//!   [`DependencyLoading`](component::DependencyLoading): the Dioxus binding.
//!
//! ## Example Usage
//!
//! ```ignore
//! use crate::prelude::*;
//!
//! #[component]
//! fn CartView() -> Element {
//!     let store = use_store();
//!     let loader = use_dependency_loader(|| vec![store.get_cart(), store.fetch_products()]);
//!     crate::views::use_reload_on_screen_visible(loader.handle());
//!
//!     rsx! {
//!         DependencyLoading { loader, loaded_view: move |_| rsx! { CartContent {} } }
//!     }
//! }
//! ```

mod component;
mod loader;
mod state;
mod visibility;

pub mod prelude {
    pub use super::component::{use_dependency_loader, DependencyLoading, FailedPlaceholder};
    pub use super::loader::{dependency, Dependency, DependencyResult, LoaderHandle};
    pub use super::state::DependencyFailure;
    pub use super::visibility::VisibilityReloader;
}
