use dioxus::prelude::*;

use futures_util::stream::StreamExt;
use tokio::sync::oneshot;

use crate::{model::Product, utils::CCStr};

use super::backend::BackendCommand;

pub static PRODUCTS: GlobalSignal<Vec<Product>> = Signal::global(Vec::new);

#[derive(Debug)]
pub enum CatalogCommand {
    /// Reload the catalog from the backend into [PRODUCTS]
    Fetch {
        result: oneshot::Sender<Result<(), CCStr>>,
    },
}

pub(super) fn use_catalog_service(
    backend_service: Coroutine<BackendCommand>,
) -> Coroutine<CatalogCommand> {
    use_coroutine(
        move |mut rx: UnboundedReceiver<CatalogCommand>| async move {
            log::info!("catalog_service (coroutine) - start");

            while let Some(cmd) = rx.next().await {
                log::debug!("catalog_service (coroutine) - Processing command {cmd:?}...");
                match cmd {
                    CatalogCommand::Fetch { result } => {
                        let _ = result.send(fetch_catalog(backend_service).await);
                    }
                }
                log::debug!("catalog_service (coroutine) - Command processed");
            }
        },
    )
}

async fn fetch_catalog(backend_service: Coroutine<BackendCommand>) -> Result<(), CCStr> {
    let backend = super::store::get_backend(backend_service).await?;
    let products = backend
        .blocking_operation(|backend| backend.load_catalog())
        .await
        .map_err(crate::utils::log_error_ccstr)?;
    log::debug!("catalog_service - {} products loaded", products.len());
    *PRODUCTS.write() = products;
    Ok(())
}

/// Look a product up in the loaded catalog
pub fn find_product(product_id: &str) -> Option<Product> {
    PRODUCTS
        .read()
        .iter()
        .find(|p| p.id == product_id)
        .cloned()
}
