//! Shared server state

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::Config;
use crate::notify::{LogNotifier, Notifier};
use crate::store;
use crate::utils::{AppError, AppResult};

/// State handed to every handler
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: store::Client,
    pub notifier: Arc<dyn Notifier>,
}

impl ServerState {
    pub fn new(config: Config, store: store::Client, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            store,
            notifier,
        }
    }

    /// Open the store under the configured working directory
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let store_path = PathBuf::from(&config.work_dir).join("comanda.db");
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|err| AppError::Internal(format!("cannot create work dir: {err}")))?;

        let store = store::Client::open(&store_path).await?;
        Ok(Self::new(config.clone(), store, Arc::new(LogNotifier)))
    }
}
