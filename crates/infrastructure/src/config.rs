//! Harness configuration.
//!
//! Values come from an optional `apicheck.toml` file, overridden by
//! `APICHECK_*` environment variables (`APICHECK_BASE_URL`,
//! `APICHECK_FEATURE_THREAD_COUNT`, ...).

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use apicheck_application::ports::{HttpEngine, Reporter, TransportError};
use apicheck_application::{ApiSession, RequestExecutor, ScenarioSteps};
use apicheck_domain::{DEFAULT_SCHEMA_FOLDER, ScenarioRequestState};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::adapters::ReqwestEngine;
use crate::validation::{DirectorySchemaSource, JsonSchemaValidator};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "apicheck.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "APICHECK";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Settings shared by every scenario of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base URL every request context targets.
    pub base_url: String,
    /// Folder prefix applied to schema file names.
    pub schema_folder: String,
    /// Directory schema resources are read from.
    pub schema_root: PathBuf,
    /// Parallelism across feature files, consumed by the external runner.
    pub feature_thread_count: Option<usize>,
    /// Number of scenario workers.
    pub scenario_thread_count: Option<usize>,
    /// Whether request and response attachments are reported.
    pub report: bool,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            schema_folder: DEFAULT_SCHEMA_FOLDER.to_string(),
            schema_root: PathBuf::from("resources"),
            feature_thread_count: None,
            scenario_thread_count: None,
            report: true,
            timeout_ms: 30_000,
        }
    }
}

impl HarnessConfig {
    /// Loads `apicheck.toml` from the working directory plus environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads the given file (optional) plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Number of scenario workers: the configured count, else the
    /// available parallelism, never zero.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.scenario_thread_count
            .filter(|count| *count > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
            })
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// A reqwest engine using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime or the client cannot be created.
    pub fn engine(&self) -> Result<ReqwestEngine, TransportError> {
        ReqwestEngine::with_timeout(self.timeout())
    }

    /// An executor targeting `base_url`, reporting only when `report` is set.
    #[must_use]
    pub fn executor<R: Reporter>(&self, reporter: R) -> RequestExecutor<R> {
        RequestExecutor::new(self.base_url.clone(), reporter).with_reporting(self.report)
    }

    /// Schema resources under `schema_root`.
    #[must_use]
    pub fn schema_source(&self) -> DirectorySchemaSource {
        DirectorySchemaSource::new(&self.schema_root)
    }

    /// A Draft-07 validator over [`schema_source`](Self::schema_source).
    #[must_use]
    pub fn validator(&self) -> JsonSchemaValidator<DirectorySchemaSource> {
        JsonSchemaValidator::new(self.schema_source())
    }

    /// Empty scenario state prefixing schema files with `schema_folder`.
    #[must_use]
    pub fn scenario_state(&self) -> ScenarioRequestState {
        ScenarioRequestState::with_schema_folder(self.schema_folder.clone())
    }

    /// Step facade for one scenario, wired from this configuration.
    #[must_use]
    pub fn steps<E: HttpEngine, R: Reporter>(
        &self,
        session: ApiSession<E>,
        reporter: R,
    ) -> ScenarioSteps<E, JsonSchemaValidator<DirectorySchemaSource>, R> {
        ScenarioSteps::with_state(
            self.scenario_state(),
            session,
            self.executor(reporter),
            self.validator(),
        )
    }
}
