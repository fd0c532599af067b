use dioxus::prelude::*;

use futures_util::stream::StreamExt;
use tokio::sync::oneshot;

use crate::{
    model::{Cart, Product},
    prelude::alert_error,
    utils::CCStr,
};

use super::backend::{BackendCommand, StoreError};

pub static CART: GlobalSignal<Cart> = Signal::global(Cart::default);

#[derive(Debug)]
pub enum CartCommand {
    /// Reload the cart from the backend into [CART]
    Get {
        result: oneshot::Sender<Result<(), CCStr>>,
    },
    Add {
        product_id: String,
        quantity: u32,
    },
    Remove {
        product_id: String,
    },
    UpdateQuantity {
        product_id: String,
        quantity: u32,
    },
}

pub(super) fn use_cart_service(
    backend_service: Coroutine<BackendCommand>,
) -> Coroutine<CartCommand> {
    use_coroutine(
        move |mut rx: UnboundedReceiver<CartCommand>| async move {
            log::info!("cart_service (coroutine) - start");

            while let Some(cmd) = rx.next().await {
                log::debug!("cart_service (coroutine) - Processing command {cmd:?}...");
                match cmd {
                    CartCommand::Get { result } => {
                        let _ = result.send(get_cart(backend_service).await);
                    }
                    CartCommand::Add {
                        product_id,
                        quantity,
                    } => {
                        let outcome = mutate_cart(backend_service, move |cart, catalog| {
                            cart.add(product(catalog, &product_id)?, quantity)
                                .map_err(StoreError::from)
                        })
                        .await;
                        report(outcome);
                    }
                    CartCommand::Remove { product_id } => {
                        let outcome = mutate_cart(backend_service, move |cart, _| {
                            cart.remove(&product_id).map_err(StoreError::from)
                        })
                        .await;
                        report(outcome);
                    }
                    CartCommand::UpdateQuantity {
                        product_id,
                        quantity,
                    } => {
                        let outcome = mutate_cart(backend_service, move |cart, catalog| {
                            cart.update_quantity(product(catalog, &product_id)?, quantity)
                                .map_err(StoreError::from)
                        })
                        .await;
                        report(outcome);
                    }
                }
                log::debug!("cart_service (coroutine) - Command processed");
            }
        },
    )
}

fn product<'a>(catalog: &'a [Product], product_id: &str) -> Result<&'a Product, StoreError> {
    catalog
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| StoreError::UnknownProduct(product_id.to_owned()))
}

fn report(outcome: Result<(), CCStr>) {
    if let Err(e) = outcome {
        alert_error(e);
    }
}

async fn get_cart(backend_service: Coroutine<BackendCommand>) -> Result<(), CCStr> {
    let backend = super::store::get_backend(backend_service).await?;
    let cart = backend
        .blocking_operation(|backend| backend.load_cart())
        .await
        .map_err(crate::utils::log_error_ccstr)?;
    *CART.write() = cart;
    Ok(())
}

/// Apply `mutation` on the persisted cart, checked against the persisted
/// catalog, then publish the new cart into [CART]
async fn mutate_cart<F>(backend_service: Coroutine<BackendCommand>, mutation: F) -> Result<(), CCStr>
where
    F: FnOnce(&mut Cart, &[Product]) -> Result<(), StoreError> + Send + 'static,
{
    let backend = super::store::get_backend(backend_service).await?;
    let cart = backend
        .blocking_operation(move |backend| {
            let catalog = backend.load_catalog()?;
            let mut cart = backend.load_cart()?;
            mutation(&mut cart, &catalog)?;
            backend.save_cart(&cart)?;
            Ok(cart)
        })
        .await
        .map_err(crate::utils::log_error_ccstr)?;
    *CART.write() = cart;
    Ok(())
}

