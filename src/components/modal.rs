use crate::prelude::*;

use crate::components::svg::{Close, DrawSvg};

/// Modal dialog centered over the screen, closed by clicking outside of it
#[component]
pub fn CenteredModal(mut is_open: Signal<bool>, title: &'static str, children: Element) -> Element {
    if !is_open() {
        return rsx! {};
    }
    rsx! {
        div {
            class: "modal-backdrop",
            role: "dialog",
            onclick: move |_| *is_open.write() = false,
            div {
                class: "modal-box",
                onclick: move |event| {
                    event.stop_propagation();
                },
                div { class: "modal-header",
                    h2 { {title} }
                    button {
                        class: "btn btn-circle btn-sm",
                        onclick: move |_| *is_open.write() = false,
                        DrawSvg::<Close> {}
                    }
                }
                {children}
            }
        }
    }
}

/// Quantities a customer may pick for a product with `stock` units left
pub fn quantity_choices(stock: u32) -> impl Iterator<Item = u32> {
    1..=stock
}

/// Pick a cart quantity, from 1 to the product stock
#[component]
pub fn QuantitySelectorModal(
    is_open: Signal<bool>,
    stock: u32,
    current: u32,
    on_select: EventHandler<u32>,
) -> Element {
    let mut is_open = is_open;
    rsx! {
        CenteredModal { is_open, title: "Quantity",
            ul { class: "quantity-list",
                for quantity in quantity_choices(stock) {
                    li {
                        key: "{quantity}",
                        class: if quantity == current { "selected" },
                        onclick: move |_| {
                            on_select.call(quantity);
                            *is_open.write() = false;
                        },
                        "{quantity}"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_go_from_one_to_stock() {
        assert_eq!(quantity_choices(3).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(quantity_choices(0).count(), 0);
    }
}
