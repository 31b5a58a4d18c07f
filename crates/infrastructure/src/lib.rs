//! apicheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer, plus the harness configuration, logging setup
//! and the worker pool that runs scenarios in parallel.

pub mod adapters;
pub mod config;
pub mod reporting;
pub mod runner;
pub mod telemetry;
pub mod validation;

pub use adapters::{ReqwestContext, ReqwestEngine};
pub use self::config::{ConfigError, HarnessConfig};
pub use reporting::{MemoryReporter, ReportEntry, TracingReporter};
pub use runner::{Scenario, ScenarioOutcome, ScenarioRunner};
pub use telemetry::init_tracing;
pub use validation::{DirectorySchemaSource, EmbeddedSchemaSource, JsonSchemaValidator};
