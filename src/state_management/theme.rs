use dioxus::prelude::*;

use futures_util::stream::StreamExt;
use serde::{Deserialize, Serialize};

use crate::prelude::alert_error;

use super::{
    backend::{BackendCommand, BackendReloadEvent},
    event_bus::{subscribe_event, EventBus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Darkmode {
    Light,
    Dark,
    /// Follow the system preference
    #[default]
    Auto,
}
impl Darkmode {
    /// Value of the `data-theme` attribute, `None` lets the system decide
    pub fn data_theme(self) -> Option<&'static str> {
        match self {
            Darkmode::Light => Some("light"),
            Darkmode::Dark => Some("dark"),
            Darkmode::Auto => None,
        }
    }
}

pub static THEME: GlobalSignal<Darkmode> = Signal::global(Darkmode::default);

#[derive(Debug)]
pub(super) enum DarkModeCommand {
    /// Internal trigger a save into the backend
    Persist { darkmode: Darkmode },
    /// Internal trigger a refresh from the backend
    Refresh,
}

/// Theme service coroutine
pub(super) fn use_theme_service(
    event_bus: EventBus,
    backend_service: Coroutine<BackendCommand>,
) -> Coroutine<DarkModeCommand> {
    let service_handle = use_coroutine(
        move |mut rx: UnboundedReceiver<DarkModeCommand>| async move {
            log::info!("darkmode_service (coroutine) - start");

            let mut cached_value = load_darkmode(backend_service).await;
            *THEME.write() = cached_value;

            while let Some(cmd) = rx.next().await {
                log::debug!("darkmode_service (coroutine) - Processing command {cmd:?}...");

                match cmd {
                    DarkModeCommand::Persist { darkmode } => {
                        if darkmode != cached_value {
                            log::debug!(
                                "darkmode_service (coroutine) - Darkmode changed, persisting..."
                            );
                            cached_value = darkmode;
                            if let Err(msg) = save_darkmode(backend_service, darkmode).await {
                                log::error!("{msg}");
                                alert_error(msg);
                            }
                        } else {
                            log::debug!("darkmode_service (coroutine) - Ignoring Persist cmd: already saved.");
                        }
                    }
                    DarkModeCommand::Refresh => {
                        cached_value = load_darkmode(backend_service).await;
                        *THEME.write() = cached_value
                    }
                }

                log::debug!("darkmode_service (coroutine) - Command processed");
            }
        },
    );
    use_hook(|| {
        subscribe_event(event_bus, move |_event: BackendReloadEvent| {
            service_handle.send(DarkModeCommand::Refresh);
        })
    });
    use_effect(move || {
        service_handle.send(DarkModeCommand::Persist { darkmode: THEME() });
    });
    service_handle
}

async fn load_darkmode(backend_service: Coroutine<BackendCommand>) -> Darkmode {
    let Ok(backend) = super::store::get_backend(backend_service).await else {
        return Darkmode::default();
    };
    backend
        .blocking_operation(|backend| backend.load_darkmode())
        .await
        .unwrap_or_default()
}

async fn save_darkmode(
    backend_service: Coroutine<BackendCommand>,
    darkmode: Darkmode,
) -> Result<(), String> {
    let backend = super::store::get_backend(backend_service)
        .await
        .map_err(|e| e.to_string())?;
    backend
        .blocking_operation(move |backend| backend.save_darkmode(darkmode))
        .await
        .map_err(|e| e.to_string())
}
