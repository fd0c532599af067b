use dioxus::prelude::*;

use tokio::sync::oneshot;

use crate::{
    dependency_loader::prelude::{dependency, Dependency, DependencyResult},
    utils::CCStr,
};

use super::{
    backend::{ApplicationConfig, BackendCommand, StoreBackend},
    cart::CartCommand,
    catalog::CatalogCommand,
    user::UserCommand,
};

const SERVICE_GONE: &str = "The store service is not running";

pub(super) async fn get_backend(
    backend_service: Coroutine<BackendCommand>,
) -> Result<StoreBackend, CCStr> {
    log::debug!("get_backend - start");
    let (result, rx) = oneshot::channel();
    backend_service.send(BackendCommand::GetBackend { result });
    let backend = rx
        .await
        .map_err(|_| crate::utils::log_error_ccstr(SERVICE_GONE))?;
    log::debug!("get_backend - loaded");
    backend
}

/// Send a command carrying a result channel and wait for its answer
async fn request<C: 'static>(
    service: Coroutine<C>,
    command: impl FnOnce(oneshot::Sender<DependencyResult>) -> C,
) -> DependencyResult {
    let (result, rx) = oneshot::channel();
    service.send(command(result));
    rx.await
        .map_err(|_| crate::utils::log_error_ccstr(SERVICE_GONE))?
}

/// Handle on the store services.
///
/// The `fetch_products`, `get_cart` and `get_user_data` operations are
/// exposed as [Dependency] values so a screen can hand them to a
/// dependency loader. Each one refreshes its global signal before settling.
#[derive(Clone, Copy)]
pub struct Store {
    backend: Coroutine<BackendCommand>,
    catalog: Coroutine<CatalogCommand>,
    cart: Coroutine<CartCommand>,
    user: Coroutine<UserCommand>,
}

pub fn use_store() -> Store {
    Store {
        backend: use_coroutine_handle(),
        catalog: use_coroutine_handle(),
        cart: use_coroutine_handle(),
        user: use_coroutine_handle(),
    }
}

impl Store {
    /// Refreshes [PRODUCTS](super::catalog::PRODUCTS)
    pub fn fetch_products(self) -> Dependency {
        let catalog = self.catalog;
        dependency(move || {
            request(catalog, |result| CatalogCommand::Fetch { result })
        })
    }

    /// Refreshes [CART](super::cart::CART)
    pub fn get_cart(self) -> Dependency {
        let cart = self.cart;
        dependency(move || request(cart, |result| CartCommand::Get { result }))
    }

    /// Refreshes [USER_DATA](super::user::USER_DATA), rejects with
    /// `401 Unauthorized` when nobody is logged in
    pub fn get_user_data(self) -> Dependency {
        let user = self.user;
        dependency(move || {
            request(user, |result| UserCommand::GetUserData { result })
        })
    }

    pub fn add_to_cart(self, product_id: &str, quantity: u32) {
        log::debug!("add_to_cart - {product_id} x{quantity}");
        self.cart.send(CartCommand::Add {
            product_id: product_id.to_owned(),
            quantity,
        });
    }
    pub fn remove_from_cart(self, product_id: &str) {
        log::debug!("remove_from_cart - {product_id}");
        self.cart.send(CartCommand::Remove {
            product_id: product_id.to_owned(),
        });
    }
    pub fn update_cart_quantity(self, product_id: &str, quantity: u32) {
        log::debug!("update_cart_quantity - {product_id} x{quantity}");
        self.cart.send(CartCommand::UpdateQuantity {
            product_id: product_id.to_owned(),
            quantity,
        });
    }

    pub async fn login(self) -> Result<(), CCStr> {
        request(self.user, |result| UserCommand::Login { result }).await
    }
    pub async fn logout(self) -> Result<(), CCStr> {
        request(self.user, |result| UserCommand::Logout { result }).await
    }

    pub async fn update_application_config(self, config: ApplicationConfig) -> Result<(), CCStr> {
        log::debug!("update_application_config - start");
        request(self.backend, |result| BackendCommand::UpdateConfig {
            config,
            result,
        })
        .await
    }
}
