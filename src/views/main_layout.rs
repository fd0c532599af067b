use crate::prelude::*;

use crate::{
    components::svg::{Account, CartIcon, DrawSvg, Storefront},
    Route,
};

#[component]
pub fn MainLayout() -> Element {
    log::debug!("MainLayout reload");

    let route = use_route::<Route>();
    use_screen_visibility_publisher(route.to_string());

    use_drop(|| log::debug!("MainLayout Dropped"));

    rsx! {
        div { class: "layout",
            header { NavBar {} }
            main { Outlet::<Route> {} }
        }
    }
}

#[component]
fn NavBar() -> Element {
    let item_count = use_memo(|| state_management::CART.read().item_count());

    rsx! {
        nav { class: "navbar",
            NavLink { route: Route::ProductListView {},
                DrawSvg::<Storefront> {}
                "Products"
            }
            div { class: "grow" }
            NavLink { route: Route::CartView {},
                DrawSvg::<CartIcon> {}
                "Cart"
                if item_count() > 0 {
                    span { class: "badge", "{item_count}" }
                }
            }
            NavLink { route: Route::UserView {},
                DrawSvg::<Account> {}
                "Account"
            }
        }
    }
}

#[component]
fn NavLink(route: Route, children: Element) -> Element {
    rsx! {
        Link { class: "navlink", active_class: "active", to: route, {children} }
    }
}
