//! Reporter adapters.

mod memory;
mod tracing_reporter;

pub use memory::{MemoryReporter, ReportEntry};
pub use tracing_reporter::TracingReporter;
