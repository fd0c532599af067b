use dioxus::prelude::*;

use futures_util::stream::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::utils::CCStr;

use super::backend::BackendCommand;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: String,
    pub name: String,
    pub email: String,
}
impl UserData {
    /// The account opened by the "Sign in" button
    pub fn demo() -> Self {
        Self {
            user_id: uuid::Uuid::new_v4().to_string(),
            name: "Demo Customer".to_owned(),
            email: "customer@example.com".to_owned(),
        }
    }
}

pub static USER_DATA: GlobalSignal<Option<UserData>> = Signal::global(|| None);

#[derive(Debug)]
pub enum UserCommand {
    /// Reload the session from the backend into [USER_DATA]
    GetUserData {
        result: oneshot::Sender<Result<(), CCStr>>,
    },
    Login {
        result: oneshot::Sender<Result<(), CCStr>>,
    },
    Logout {
        result: oneshot::Sender<Result<(), CCStr>>,
    },
}

pub(super) fn use_user_service(
    backend_service: Coroutine<BackendCommand>,
) -> Coroutine<UserCommand> {
    use_coroutine(
        move |mut rx: UnboundedReceiver<UserCommand>| async move {
            log::info!("user_service (coroutine) - start");

            while let Some(cmd) = rx.next().await {
                log::debug!("user_service (coroutine) - Processing command {cmd:?}...");
                match cmd {
                    UserCommand::GetUserData { result } => {
                        let outcome = load_user(backend_service).await;
                        let _ = result.send(outcome);
                    }
                    UserCommand::Login { result } => {
                        let outcome = login(backend_service).await;
                        let _ = result.send(outcome);
                    }
                    UserCommand::Logout { result } => {
                        let outcome = logout(backend_service).await;
                        let _ = result.send(outcome);
                    }
                }
                log::debug!("user_service (coroutine) - Command processed");
            }
        },
    )
}

async fn load_user(backend_service: Coroutine<BackendCommand>) -> Result<(), CCStr> {
    let backend = super::store::get_backend(backend_service).await?;
    let outcome = backend
        .blocking_operation(|backend| backend.load_session())
        .await;
    match outcome {
        Ok(user) => {
            *USER_DATA.write() = Some(user);
            Ok(())
        }
        Err(e) => {
            *USER_DATA.write() = None;
            Err(crate::utils::log_error_ccstr(e))
        }
    }
}

async fn login(backend_service: Coroutine<BackendCommand>) -> Result<(), CCStr> {
    let backend = super::store::get_backend(backend_service).await?;
    let user = backend
        .blocking_operation(|backend| {
            let user = UserData::demo();
            backend.save_session(&user)?;
            Ok(user)
        })
        .await
        .map_err(crate::utils::log_error_ccstr)?;
    log::info!("user_service - {} logged in", user.email);
    *USER_DATA.write() = Some(user);
    Ok(())
}

async fn logout(backend_service: Coroutine<BackendCommand>) -> Result<(), CCStr> {
    let backend = super::store::get_backend(backend_service).await?;
    backend
        .blocking_operation(|backend| backend.clear_session())
        .await
        .map_err(crate::utils::log_error_ccstr)?;
    log::info!("user_service - logged out");
    *USER_DATA.write() = None;
    Ok(())
}
