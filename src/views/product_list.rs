use crate::prelude::*;

use crate::{
    components::{card::Card, search_bar::SearchBar},
    dependency_loader::prelude::*,
    model::Product,
    utils::{format_price, CCStr},
    Route,
};

use super::{use_reload_on_screen_visible, RetryButton, TitledView};

#[component]
pub fn ProductListView() -> Element {
    log::debug!("ProductListView Rendered");

    let store = use_store();
    let loader = use_dependency_loader(|| vec![store.fetch_products(), store.get_cart()]);
    use_reload_on_screen_visible(loader.handle());

    use_drop(|| log::debug!("ProductListView Dropped"));

    let mut query = use_signal(String::new);
    let products = use_memo(move || {
        let query = query.read();
        state_management::PRODUCTS
            .read()
            .iter()
            .filter(|p| p.matches_query(&query))
            .cloned()
            .collect::<Vec<_>>()
    });

    let handle = loader.handle();
    rsx! {
        TitledView { title: CCStr::from("Products"),
            SearchBar {
                on_submit: move |submitted| query.set(submitted),
                on_cancel: move |_| query.set(String::new()),
            }
            DependencyLoading {
                loader,
                loaded_view: move |_| rsx! {
                    if products.read().is_empty() {
                        p { class: "empty", "No product matches \"{query}\"" }
                    }
                    div { class: "product-grid",
                        for product in products.read().iter() {
                            ProductCard { key: "{product.id}", product: product.clone() }
                        }
                    }
                },
                failed_view: move |failure: DependencyFailure| rsx! {
                    FailedPlaceholder { failure }
                    RetryButton { handle: handle.clone() }
                },
            }
        }
    }
}

#[component]
fn ProductCard(product: Product) -> Element {
    let in_cart = use_memo({
        let product_id = product.id.clone();
        move || state_management::CART.read().item(&product_id).is_some()
    });
    let image_url = product.image_urls.first().cloned();
    let route = Route::ProductView {
        product_id: product.id.clone(),
    };

    rsx! {
        Link { to: route,
            Card { class: "product-card",
                if let Some(image_url) = image_url {
                    img { src: "{image_url}", alt: "{product.name}" }
                }
                h3 { "{product.name}" }
                div { class: "price", {format_price(product.price)} }
                if !product.in_stock() {
                    span { class: "badge badge-error", "Out of stock" }
                } else if in_cart() {
                    span { class: "badge badge-success", "In your cart" }
                }
            }
        }
    }
}
