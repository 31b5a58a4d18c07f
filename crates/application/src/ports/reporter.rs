//! Reporting port

use std::sync::Arc;

use apicheck_domain::{ElapsedTime, RequestAttachment, ResponseAttachment};

/// Receives diagnostic attachments for each executed request.
///
/// Rendering is entirely up to the implementation.
pub trait Reporter {
    /// Records what was sent.
    fn attach_request(&self, attachment: &RequestAttachment);

    /// Records what came back.
    fn attach_response(&self, attachment: &ResponseAttachment);

    /// Records a named, already formatted text attachment.
    fn attach_text(&self, name: &str, content: &str);

    /// Records the response-time metric.
    fn record_response_time(&self, elapsed: ElapsedTime);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn attach_request(&self, attachment: &RequestAttachment) {
        (**self).attach_request(attachment);
    }

    fn attach_response(&self, attachment: &ResponseAttachment) {
        (**self).attach_response(attachment);
    }

    fn attach_text(&self, name: &str, content: &str) {
        (**self).attach_text(name, content);
    }

    fn record_response_time(&self, elapsed: ElapsedTime) {
        (**self).record_response_time(elapsed);
    }
}

/// Reporter that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn attach_request(&self, _attachment: &RequestAttachment) {}

    fn attach_response(&self, _attachment: &ResponseAttachment) {}

    fn attach_text(&self, _name: &str, _content: &str) {}

    fn record_response_time(&self, _elapsed: ElapsedTime) {}
}
