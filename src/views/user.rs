use crate::prelude::*;

use crate::{
    components::{card::Card, haptic_button::HapticButton},
    dependency_loader::prelude::*,
    utils::CCStr,
};

use super::{use_reload_on_screen_visible, RetryButton, TitledView};

#[component]
pub fn UserView() -> Element {
    log::debug!("UserView Rendered");

    let store = use_store();
    let loader = use_dependency_loader(|| vec![store.get_user_data()]);
    use_reload_on_screen_visible(loader.handle());

    use_drop(|| log::debug!("UserView Dropped"));

    let loaded_handle = loader.handle();
    let failed_handle = loader.handle();
    rsx! {
        TitledView { title: CCStr::from("Account"),
            DependencyLoading {
                loader,
                loaded_view: move |_| rsx! {
                    AccountDetails { handle: loaded_handle.clone() }
                },
                failed_view: move |failure: DependencyFailure| rsx! {
                    SignedOut { failure, handle: failed_handle.clone() }
                },
            }
        }
    }
}

#[component]
fn AccountDetails(handle: LoaderHandle) -> Element {
    let store = use_store();
    let Some(user) = state_management::USER_DATA() else {
        return rsx! {};
    };

    let logout = move |_| {
        let handle = handle.clone();
        async move {
            match store.logout().await {
                Ok(()) => {
                    alert_info("Signed out");
                    handle.load(true);
                }
                Err(e) => alert_error(e),
            }
        }
    };

    rsx! {
        Card { class: "account",
            h3 { "Account details" }
            p { "{user.name}" }
            p { "{user.email}" }
            p { class: "uid", "UID: {user.user_id}" }
        }
        Card { class: "settings",
            h3 { "Color theme" }
            DarkmodeOptions {}
        }
        StoreSettings {}
        HapticButton { class: "btn-error btn-wide", onclick: logout, "Logout" }
    }
}

#[component]
fn SignedOut(failure: DependencyFailure, handle: LoaderHandle) -> Element {
    let store = use_store();
    let unauthorized = failure
        .reasons()
        .iter()
        .any(|reason| reason.contains("401"));

    if !unauthorized {
        return rsx! {
            FailedPlaceholder { failure }
            RetryButton { handle }
        };
    }

    let login = move |_| {
        let handle = handle.clone();
        async move {
            match store.login().await {
                Ok(()) => {
                    alert_success("Signed in");
                    handle.load(true);
                }
                Err(e) => alert_error(e),
            }
        }
    };

    rsx! {
        Card { class: "signed-out",
            p { "You are not signed in" }
            HapticButton { class: "btn-primary btn-wide", onclick: login, "Sign in" }
        }
    }
}

/// Artificial latency of the "slow network" setting
const SLOW_NETWORK_LATENCY_MS: u64 = 1500;

#[component]
fn StoreSettings() -> Element {
    let store = use_store();
    let config = state_management::APPLICATION_CONFIG();
    let slow_network = config.latency_ms > 0;
    let datadir = config.datadir.display().to_string();

    let toggle_slow_network = move |_| {
        let mut config = state_management::APPLICATION_CONFIG();
        config.latency_ms = if slow_network { 0 } else { SLOW_NETWORK_LATENCY_MS };
        async move {
            match store.update_application_config(config).await {
                Ok(()) => alert_info("Store settings updated"),
                Err(e) => alert_error(e),
            }
        }
    };

    rsx! {
        Card { class: "settings",
            h3 { "Store" }
            p { class: "uid", "Data directory: {datadir}" }
            label {
                input {
                    r#type: "checkbox",
                    checked: slow_network,
                    onchange: toggle_slow_network,
                }
                " Simulate a slow network"
            }
        }
    }
}

const DARKMODE_OPTIONS: [(Darkmode, &str, &str); 3] = [
    (Darkmode::Dark, "🌑", "DARK"),
    (Darkmode::Auto, "🌓", "AUTO"),
    (Darkmode::Light, "🌕", "LIGHT"),
];

#[component]
fn DarkmodeOptions() -> Element {
    let current = state_management::THEME();
    let options = DARKMODE_OPTIONS.map(|(darkmode, icon, label)| {
        let class = if darkmode == current { "active" } else { "" };
        rsx! {
            HapticButton {
                key: "{label}",
                class,
                onclick: move |_| *state_management::THEME.write() = darkmode,
                span { class: "icon", {icon} }
                span { {label} }
            }
        }
    });
    rsx! {
        div { class: "darkmode-options", {options.into_iter()} }
    }
}
