use crate::prelude::*;

use crate::{
    components::{
        card::Card,
        haptic_button::HapticButton,
        modal::QuantitySelectorModal,
        svg::{ArrowLeft, DrawSvg},
    },
    dependency_loader::prelude::*,
    model::Product,
    utils::format_price,
    Route,
};

use super::{use_reload_on_screen_visible, RetryButton};

#[component]
pub fn ProductView(product_id: String) -> Element {
    log::debug!("ProductView Rendered for {product_id}");

    let store = use_store();
    let loader = use_dependency_loader(|| vec![store.fetch_products(), store.get_cart()]);
    use_reload_on_screen_visible(loader.handle());

    use_drop(|| log::debug!("ProductView Dropped"));

    let handle = loader.handle();
    rsx! {
        Link { class: "btn btn-ghost", to: Route::ProductListView {},
            DrawSvg::<ArrowLeft> {}
            "All products"
        }
        DependencyLoading {
            loader,
            loaded_view: move |_| match state_management::find_product(&product_id) {
                Some(product) => rsx! {
                    ProductDetails { product }
                },
                None => rsx! {
                    p { class: "empty", "This product is no longer available" }
                },
            },
            failed_view: move |failure: DependencyFailure| rsx! {
                FailedPlaceholder { failure }
                RetryButton { handle: handle.clone() }
            },
        }
    }
}

#[component]
fn ProductDetails(product: Product) -> Element {
    let store = use_store();
    let quantity_modal_open = use_signal(|| false);
    let cart_quantity = use_memo({
        let product_id = product.id.clone();
        move || {
            state_management::CART
                .read()
                .item(&product_id)
                .map(|item| item.quantity)
        }
    });

    let product_id = product.id.clone();
    let cart_actions = match cart_quantity() {
        None if product.in_stock() => rsx! {
            HapticButton {
                class: "btn-primary btn-wide",
                onclick: move |_| store.add_to_cart(&product_id, 1),
                "ADD TO CART"
            }
        },
        None => rsx! {
            h3 { class: "text-error", "Out Of Stock" }
        },
        Some(quantity) => {
            let remove_id = product_id.clone();
            let mut quantity_modal_open = quantity_modal_open;
            rsx! {
                HapticButton {
                    class: "btn-error btn-wide",
                    onclick: move |_| store.remove_from_cart(&remove_id),
                    "REMOVE FROM CART"
                }
                div { class: "quantity",
                    span { "Quantity: {quantity}" }
                    HapticButton {
                        class: "btn-primary",
                        onclick: move |_| quantity_modal_open.set(true),
                        "CHANGE"
                    }
                }
                QuantitySelectorModal {
                    is_open: quantity_modal_open,
                    stock: product.stock,
                    current: quantity,
                    on_select: move |quantity| store.update_cart_quantity(&product_id, quantity),
                }
            }
        }
    };

    rsx! {
        Card { class: "product-images",
            div { class: "carousel",
                for (index , image_url) in product.image_urls.iter().enumerate() {
                    img {
                        key: "{index}",
                        src: "{image_url}",
                        alt: "{product.name}",
                    }
                }
            }
            div { class: "cart-actions", {cart_actions} }
        }
        Card {
            h2 { "{product.name}" }
            h3 { {format_price(product.price)} }
            p { "{product.description}" }
        }
        Card {
            h3 { "Details" }
            div { class: "details",
                div {
                    p { "Height: {product.height}" }
                    p { "Width: {product.width}" }
                    p { "Depth: {product.depth}" }
                }
                div {
                    p { "Weight: {product.weight}" }
                }
                div {
                    p { "Color: {product.color}" }
                }
                div {
                    p { "Material: {product.material}" }
                }
            }
        }
    }
}
