use std::path::PathBuf;

use dioxus::prelude::*;

use futures_util::stream::StreamExt;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::oneshot;

use crate::{
    model::{default_catalog, Cart, CartError, Product},
    utils::CCStr,
};

use super::{event_bus::EventBus, theme::Darkmode, user::UserData};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed document {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("401 Unauthorized")]
    Unauthorized,
    #[error("Unknown product {0}")]
    UnknownProduct(String),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error("Backend task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationConfig {
    pub datadir: PathBuf,
    /// Artificial delay applied to every backend operation
    pub latency_ms: u64,
}
impl Default for ApplicationConfig {
    fn default() -> Self {
        let mut datadir: PathBuf = dirs_next::home_dir().unwrap_or_default();
        datadir.push(".storefront-gui");
        Self {
            datadir,
            latency_ms: 0,
        }
    }
}
pub static APPLICATION_CONFIG: GlobalSignal<ApplicationConfig> =
    Signal::global(|| ApplicationConfig::default());

/// Event fired when the backend is recreated, for example on a new data directory
#[derive(Debug, Clone, Copy)]
pub struct BackendReloadEvent;
impl super::event_bus::EventId for BackendReloadEvent {
    fn event_id() -> &'static str {
        "backend_reload"
    }
}

const CATALOG_DOCUMENT: &str = "catalog.json";
const CART_DOCUMENT: &str = "cart.json";
const SESSION_DOCUMENT: &str = "session.json";
const SETTINGS_DOCUMENT: &str = "settings.json";

/// Store documents persisted as JSON files in the data directory.
///
/// Every method is blocking: use [StoreBackend::blocking_operation] from
/// async code.
#[derive(Debug, Clone)]
pub struct StoreBackend {
    datadir: PathBuf,
    latency_ms: u64,
}

impl StoreBackend {
    pub fn new(config: &ApplicationConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.datadir).map_err(|source| StoreError::Io {
            path: config.datadir.clone(),
            source,
        })?;
        let backend = Self {
            datadir: config.datadir.clone(),
            latency_ms: config.latency_ms,
        };
        if !backend.document_path(CATALOG_DOCUMENT).exists() {
            log::info!("Seeding the catalog in {}", backend.datadir.display());
            backend.write_document(CATALOG_DOCUMENT, &default_catalog())?;
        }
        Ok(backend)
    }

    /// Run `f` on a blocking thread, after the configured latency
    pub async fn blocking_operation<R, F>(self, f: F) -> Result<R, StoreError>
    where
        R: Send + 'static,
        F: FnOnce(StoreBackend) -> Result<R, StoreError> + Send + 'static,
    {
        if self.latency_ms > 0 {
            crate::utils::async_sleep(self.latency_ms).await;
        }
        tokio::task::spawn_blocking(move || f(self))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    pub fn load_catalog(&self) -> Result<Vec<Product>, StoreError> {
        self.read_document(CATALOG_DOCUMENT)
            .map(Option::unwrap_or_default)
    }

    pub fn load_cart(&self) -> Result<Cart, StoreError> {
        self.read_document(CART_DOCUMENT)
            .map(Option::unwrap_or_default)
    }
    pub fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
        self.write_document(CART_DOCUMENT, cart)
    }

    /// Fails with [StoreError::Unauthorized] when nobody is logged in
    pub fn load_session(&self) -> Result<UserData, StoreError> {
        self.read_document(SESSION_DOCUMENT)?
            .ok_or(StoreError::Unauthorized)
    }
    pub fn save_session(&self, user: &UserData) -> Result<(), StoreError> {
        self.write_document(SESSION_DOCUMENT, user)
    }
    pub fn clear_session(&self) -> Result<(), StoreError> {
        let path = self.document_path(SESSION_DOCUMENT);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    pub fn load_darkmode(&self) -> Result<Darkmode, StoreError> {
        self.read_document(SETTINGS_DOCUMENT)
            .map(Option::unwrap_or_default)
    }
    pub fn save_darkmode(&self, darkmode: Darkmode) -> Result<(), StoreError> {
        self.write_document(SETTINGS_DOCUMENT, &darkmode)
    }

    fn document_path(&self, name: &str) -> PathBuf {
        self.datadir.join(name)
    }

    fn read_document<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.document_path(name);
        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }

    fn write_document<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.document_path(name);
        let content = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, content).map_err(|source| StoreError::Io { path, source })
    }
}

#[derive(Debug)]
pub enum BackendCommand {
    GetBackend {
        result: oneshot::Sender<Result<StoreBackend, CCStr>>,
    },
    /// Update configuration
    UpdateConfig {
        config: ApplicationConfig,
        result: oneshot::Sender<Result<(), CCStr>>,
    },
}

pub(super) fn use_backend_service(event_bus_service: EventBus) -> Coroutine<BackendCommand> {
    use_coroutine(
        move |mut rx: UnboundedReceiver<BackendCommand>| async move {
            log::info!("backend_service (coroutine) - start");

            let current_config = create_config();
            let mut backend = open_backend(current_config.clone()).await;
            *APPLICATION_CONFIG.write() = current_config;

            while let Some(cmd) = rx.next().await {
                log::debug!("backend_service (coroutine) - Processing commmand {cmd:?}...");
                match cmd {
                    BackendCommand::GetBackend { result } => {
                        let _ = result.send(backend.clone());
                    }
                    BackendCommand::UpdateConfig { config, result } => {
                        match open_backend(config.clone()).await {
                            Ok(new_backend) => {
                                backend = Ok(new_backend);
                                *APPLICATION_CONFIG.write() = config;
                                super::event_bus::publish_event(
                                    event_bus_service,
                                    BackendReloadEvent,
                                );
                                let _ = result.send(Ok(()));
                            }
                            Err(e) => {
                                let _ = result.send(Err(e));
                            }
                        }
                    }
                }
                log::debug!("backend_service (coroutine) - Command processed");
            }
        },
    )
}

async fn open_backend(config: ApplicationConfig) -> Result<StoreBackend, CCStr> {
    tokio::task::spawn_blocking(move || StoreBackend::new(&config))
        .await
        .map_err(crate::utils::log_error_ccstr)?
        .map_err(|e| crate::utils::log_error_ccstr(format!("Could not open the store: {e}")))
}

fn create_config() -> ApplicationConfig {
    let mut default_config = ApplicationConfig::default();

    // Env vars override the defaults, unparsable values are ignored
    if let Some(datadir) = std::env::var_os("STOREFRONT_HOME") {
        default_config.datadir = PathBuf::from(datadir);
    }
    if let Some(latency_ms) = std::env::var("STOREFRONT_LATENCY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        default_config.latency_ms = latency_ms;
    }
    default_config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_in(dir: &tempfile::TempDir) -> StoreBackend {
        StoreBackend::new(&ApplicationConfig {
            datadir: dir.path().join("store"),
            latency_ms: 0,
        })
        .expect("backend")
    }

    #[test]
    fn fresh_datadir_gets_the_default_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend_in(&dir);
        assert_eq!(backend.load_catalog().unwrap(), default_catalog());
        assert!(backend.load_cart().unwrap().is_empty());
    }

    #[test]
    fn cart_round_trips_through_its_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend_in(&dir);
        let catalog = backend.load_catalog().unwrap();
        let mut cart = Cart::default();
        cart.add(&catalog[0], 2).unwrap();
        backend.save_cart(&cart).unwrap();
        assert_eq!(backend_in(&dir).load_cart().unwrap(), cart);
    }

    #[test]
    fn missing_session_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend_in(&dir);
        let error = backend.load_session().unwrap_err();
        assert!(matches!(error, StoreError::Unauthorized));
        assert_eq!(error.to_string(), "401 Unauthorized");

        let user = UserData::demo();
        backend.save_session(&user).unwrap();
        assert_eq!(backend.load_session().unwrap(), user);
        backend.clear_session().unwrap();
        backend.clear_session().unwrap();
        assert!(matches!(backend.load_session(), Err(StoreError::Unauthorized)));
    }

    #[test]
    fn malformed_documents_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend_in(&dir);
        std::fs::write(backend.datadir.join(CART_DOCUMENT), b"{ not json").unwrap();
        assert!(matches!(backend.load_cart(), Err(StoreError::Json { .. })));
    }

    #[test]
    fn darkmode_defaults_until_saved() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend_in(&dir);
        assert_eq!(backend.load_darkmode().unwrap(), Darkmode::default());
        backend.save_darkmode(Darkmode::Light).unwrap();
        assert_eq!(backend.load_darkmode().unwrap(), Darkmode::Light);
    }

    #[tokio::test(start_paused = true)]
    async fn blocking_operations_wait_for_the_latency() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = backend_in(&dir);
        backend.latency_ms = 300;
        let start = tokio::time::Instant::now();
        let catalog = backend
            .blocking_operation(|b| b.load_catalog())
            .await
            .unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(300));
        assert_eq!(catalog.len(), default_catalog().len());
    }
}
