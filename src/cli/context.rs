//! Command execution context
//!
//! Wires the library's capabilities to the CLI host: the token slot lives in
//! the config file (the terminal's stand-in for the browser's session
//! storage) and the worker client is built from the configured URL.

use std::sync::Arc;

use crate::client::{WorkerApi, WorkerClient};
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use crate::session::{SessionHolder, TokenStore};

/// Token slot backed by the config file
pub struct ConfigTokenStore {
    config_path: Option<String>,
}

impl ConfigTokenStore {
    pub fn new(config_path: Option<&str>) -> Self {
        Self {
            config_path: config_path.map(|s| s.to_string()),
        }
    }

    fn load(&self) -> Result<Config> {
        match Config::load_at(self.config_path.as_deref()) {
            Ok(config) => Ok(config),
            Err(Error::Config(ConfigError::NotFound)) => Ok(Config::default()),
            Err(err) => Err(err),
        }
    }
}

impl TokenStore for ConfigTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.load()?.token)
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut config = self.load()?;
        config.token = Some(token.to_string());
        config.save_at(self.config_path.as_deref())
    }

    fn clear(&self) -> Result<()> {
        let mut config = self.load()?;
        config.token = None;
        config.save_at(self.config_path.as_deref())
    }
}

/// Context for command execution containing config, session, and client
pub struct CommandContext {
    /// Loaded configuration (default if no file exists yet)
    pub config: Config,
    /// Session holder backed by the config file's token slot
    pub session: Arc<SessionHolder>,
}

impl CommandContext {
    /// Create a context from the global `--config` override.
    ///
    /// Missing config is fine for local-only commands; commands that reach
    /// the worker fail later with `MissingWorkerUrl` via [`Self::client`].
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let config = match Config::load_at(config_path) {
            Ok(config) => config,
            Err(Error::Config(ConfigError::NotFound)) => Config::default(),
            Err(err) => return Err(err),
        };

        let session = Arc::new(SessionHolder::new(Box::new(ConfigTokenStore::new(
            config_path,
        ))));

        Ok(Self { config, session })
    }

    /// Build a worker client from the configured URL
    pub fn client(&self) -> Result<Arc<dyn WorkerApi>> {
        let url = self.config.worker_url()?;
        Ok(Arc::new(WorkerClient::new(url)?))
    }
}
