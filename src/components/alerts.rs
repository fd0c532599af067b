use crate::prelude::*;

use uuid::Uuid;

use std::collections::VecDeque;
use std::time::Duration;

use crate::components::svg::{AlertCircle, Close, DrawSvg, SvgSize::Size5};
use crate::utils::CCStr;

static ALERTS: GlobalSignal<VecDeque<Alert>> = Signal::global(VecDeque::new);

/// Maximum number of alerts to display at once
const MAX_ALERTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertClass {
    Success,
    Error,
    Info,
}
impl core::fmt::Display for AlertClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Success => "alert-success",
            Self::Error => "alert-error",
            Self::Info => "alert-info",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    uuid: Uuid,
    alert_class: AlertClass,
    title: CCStr,
    message: CCStr,
    timeout_ms: u64,
}
impl Alert {
    fn new(alert_class: AlertClass, title: &str, message: impl Into<CCStr>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            alert_class,
            title: title.into(),
            message: message.into(),
            timeout_ms: 4000,
        }
    }
    pub fn success(message: impl Into<CCStr>) -> Self {
        Self::new(AlertClass::Success, "Done", message)
    }
    pub fn error(message: impl Into<CCStr>) -> Self {
        Self::new(AlertClass::Error, "Something went wrong", message)
    }
    pub fn info(message: impl Into<CCStr>) -> Self {
        Self::new(AlertClass::Info, "Info", message)
    }
}

/// Oldest alerts are dropped once `MAX_ALERTS` are displayed
fn push_alert(alerts: &mut VecDeque<Alert>, alert: Alert) {
    while alerts.len() >= MAX_ALERTS {
        alerts.pop_front();
    }
    alerts.push_back(alert);
}

pub fn add_alert(alert: Alert) {
    push_alert(&mut ALERTS.write(), alert);
}

pub fn alert_success(message: impl Into<CCStr>) {
    add_alert(Alert::success(message));
}

pub fn alert_error(message: impl Into<CCStr>) {
    add_alert(Alert::error(message));
}

pub fn alert_info(message: impl Into<CCStr>) {
    add_alert(Alert::info(message));
}

#[component]
pub fn AlertsContainer() -> Element {
    rsx! {
        div { class: "alerts",
            for alert in ALERTS().iter() {
                AlertDisplay { key: "{alert.uuid}", alert: alert.clone() }
            }
        }
    }
}

#[component]
fn AlertDisplay(alert: Alert) -> Element {
    log::debug!("AlertDisplay Rendered: {alert:?}");
    fn close_alert(uuid: Uuid) {
        ALERTS.write().retain(|a| a.uuid != uuid);
    }

    let uuid = alert.uuid;
    let timeout_ms = alert.timeout_ms;
    use_hook(move || {
        spawn(async move {
            tokio::time::sleep(Duration::from_millis(timeout_ms)).await;
            log::debug!("Closing alert: {uuid}");
            close_alert(uuid);
        })
    });

    rsx! {
        div { role: "alert", class: "alert {alert.alert_class}",
            DrawSvg::<AlertCircle> { size: Size5 }
            div { class: "alert-text",
                b { "{alert.title}" }
                span { "{alert.message}" }
            }
            button {
                class: "btn btn-circle btn-xs",
                onclick: move |_| close_alert(uuid),
                DrawSvg::<Close> { size: Size5 }
            }
        }
    }
}
