//! Reporter that writes attachments to the tracing log.

use apicheck_application::ports::Reporter;
use apicheck_domain::{ElapsedTime, RequestAttachment, ResponseAttachment};
use tracing::info;

/// Renders attachments as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn attach_request(&self, attachment: &RequestAttachment) {
        info!(
            target: "apicheck::report",
            url = %attachment.url,
            method = %attachment.method,
            headers = ?attachment.headers,
            cookies = ?attachment.cookies,
            body = attachment.body.as_deref().unwrap_or(""),
            "Request"
        );
    }

    fn attach_response(&self, attachment: &ResponseAttachment) {
        info!(
            target: "apicheck::report",
            status = attachment.status,
            headers = ?attachment.headers,
            body = %attachment.body,
            "Response"
        );
    }

    fn attach_text(&self, name: &str, content: &str) {
        info!(target: "apicheck::report", name, content, "Attachment");
    }

    fn record_response_time(&self, elapsed: ElapsedTime) {
        info!(
            target: "apicheck::report",
            millis = elapsed.as_millis(),
            "Response time: {elapsed}"
        );
    }
}
