//! In-memory reporter.

use std::sync::{Mutex, PoisonError};

use apicheck_application::ports::Reporter;
use apicheck_domain::{ElapsedTime, RequestAttachment, ResponseAttachment};

/// One recorded attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    /// Request attachment.
    Request(RequestAttachment),
    /// Response attachment.
    Response(ResponseAttachment),
    /// Named text attachment.
    Text {
        /// Attachment name.
        name: String,
        /// Attachment content.
        content: String,
    },
    /// Response-time metric.
    ResponseTime(ElapsedTime),
}

/// Collects attachments in order so callers can inspect them afterwards.
///
/// Safe to share between workers behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<ReportEntry>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far.
    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        self.lock().clone()
    }

    /// Removes and returns everything recorded so far.
    #[must_use]
    pub fn drain(&self) -> Vec<ReportEntry> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, entry: ReportEntry) {
        self.lock().push(entry);
    }
}

impl Reporter for MemoryReporter {
    fn attach_request(&self, attachment: &RequestAttachment) {
        self.push(ReportEntry::Request(attachment.clone()));
    }

    fn attach_response(&self, attachment: &ResponseAttachment) {
        self.push(ReportEntry::Response(attachment.clone()));
    }

    fn attach_text(&self, name: &str, content: &str) {
        self.push(ReportEntry::Text {
            name: name.to_string(),
            content: content.to_string(),
        });
    }

    fn record_response_time(&self, elapsed: ElapsedTime) {
        self.push(ReportEntry::ResponseTime(elapsed));
    }
}
