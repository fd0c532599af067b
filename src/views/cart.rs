use crate::prelude::*;

use crate::{
    components::{
        card::Card,
        haptic_button::HapticButton,
        svg::{Delete, DrawSvg, Minus, Plus, SvgSize::Size5},
    },
    dependency_loader::prelude::*,
    model::{CartItem, Product},
    utils::{format_price, CCStr},
    Route,
};

use super::{use_reload_on_screen_visible, RetryButton, TitledView};

#[component]
pub fn CartView() -> Element {
    log::debug!("CartView Rendered");

    let store = use_store();
    let loader = use_dependency_loader(|| vec![store.get_cart(), store.fetch_products()]);
    use_reload_on_screen_visible(loader.handle());

    use_drop(|| log::debug!("CartView Dropped"));

    let handle = loader.handle();
    rsx! {
        TitledView { title: CCStr::from("Cart"),
            DependencyLoading {
                loader,
                loaded_view: move |_| rsx! {
                    CartContent {}
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
fn CartContent() -> Element {
    let cart = state_management::CART.read().clone();
    if cart.is_empty() {
        return rsx! {
            div { class: "empty",
                p { "Your cart is empty" }
                Link { class: "btn btn-primary", to: Route::ProductListView {}, "Browse products" }
            }
        };
    }

    let products = state_management::PRODUCTS.read();
    let total = format_price(cart.total(&products));
    let item_count = cart.item_count();
    let lines = cart
        .items()
        .iter()
        .filter_map(|item| {
            products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|product| (item.clone(), product.clone()))
        })
        .collect::<Vec<_>>();

    rsx! {
        for (item , product) in lines {
            CartLine { key: "{item.product_id}", item, product }
        }
        Card { class: "cart-total",
            span { "{item_count} items" }
            b { "Total: {total}" }
        }
    }
}

#[component]
fn CartLine(item: CartItem, product: Product) -> Element {
    let store = use_store();
    let quantity = item.quantity;
    let product_id = item.product_id.clone();
    let (dec_id, inc_id) = (product_id.clone(), product_id.clone());
    let route = Route::ProductView {
        product_id: product_id.clone(),
    };

    rsx! {
        Card { class: "cart-line",
            Link { to: route,
                h3 { "{product.name}" }
            }
            span { class: "price", {format_price(product.price * u64::from(quantity))} }
            div { class: "quantity",
                HapticButton {
                    class: "btn-circle btn-sm",
                    disabled: quantity <= 1,
                    onclick: move |_| store.update_cart_quantity(&dec_id, quantity - 1),
                    DrawSvg::<Minus> { size: Size5 }
                }
                span { "{quantity}" }
                HapticButton {
                    class: "btn-circle btn-sm",
                    disabled: quantity >= product.stock,
                    onclick: move |_| store.update_cart_quantity(&inc_id, quantity + 1),
                    DrawSvg::<Plus> { size: Size5 }
                }
                HapticButton {
                    class: "btn-circle btn-sm btn-error",
                    onclick: move |_| store.remove_from_cart(&product_id),
                    DrawSvg::<Delete> { size: Size5 }
                }
            }
        }
    }
}
