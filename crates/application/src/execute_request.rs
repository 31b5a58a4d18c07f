//! Execute Request Use Case
//!
//! Sends an assembled [`Request`] through a worker's HTTP engine, times the
//! call and hands the diagnostic attachments to the reporter.

use std::time::Instant;

use apicheck_domain::{
    DomainError, ElapsedTime, HttpMethod, Request, RequestAttachment, RequestOptions,
    ResponseAttachment, ResponseSpec, substitute, unresolved_placeholders,
};
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::ports::{ContextOptions, HttpEngine, Reporter, RequestContext, TransportError};
use crate::session::ApiSession;

/// Name of the timing attachment.
pub const RESPONSE_TIME_ATTACHMENT: &str = "Response time";

/// Header name of the fixed request content type.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Error type for the execute request use case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecuteRequestError {
    /// The verb has no dispatch operation.
    #[error("Method [{0}] not implemented")]
    UnsupportedMethod(HttpMethod),

    /// The endpoint could not be resolved.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The transport failed.
    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl ExecuteRequestError {
    /// Returns true for configuration errors that abort the scenario.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedMethod(_) | Self::Domain(_))
    }
}

/// A response together with the time its dispatch took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedRequest {
    /// The raw response.
    pub response: ResponseSpec,
    /// Wall-clock time around the dispatch call.
    pub elapsed: ElapsedTime,
}

/// Use case for executing scenario requests.
///
/// # Example
///
/// ```ignore
/// let executor = RequestExecutor::new("https://api.example.com", TracingReporter);
/// let mut session = ApiSession::open(ReqwestEngine::new()?);
///
/// let request = state.assemble();
/// let executed = executor.execute(&mut session, &request, HttpMethod::Get, "/users")?;
/// ```
pub struct RequestExecutor<R: Reporter> {
    base_url: String,
    reporter: R,
    report: bool,
}

impl<R: Reporter> RequestExecutor<R> {
    /// Creates an executor sending every request relative to `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, reporter: R) -> Self {
        Self {
            base_url: base_url.into(),
            reporter,
            report: true,
        }
    }

    /// Enables or disables the reporter attachments.
    #[must_use]
    pub fn with_reporting(mut self, report: bool) -> Self {
        self.report = report;
        self
    }

    /// The base URL every context is created with.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The reporter receiving attachments.
    #[must_use]
    pub const fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Whether attachments are handed to the reporter.
    #[must_use]
    pub const fn is_reporting(&self) -> bool {
        self.report
    }

    /// Executes `request` with `method` against `endpoint`.
    ///
    /// A fresh request context is created on the session for this call and
    /// stays registered there until the session disposes it. PATCH and
    /// DELETE endpoints are resolved against the request's path params
    /// first; other verbs send the endpoint as given.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteRequestError::UnsupportedMethod`] for verbs without
    /// a dispatch operation, a domain error if a path param is not a
    /// string, or the transport error.
    pub fn execute<E: HttpEngine>(
        &self,
        session: &mut ApiSession<E>,
        request: &Request,
        method: HttpMethod,
        endpoint: &str,
    ) -> Result<ExecutedRequest, ExecuteRequestError> {
        let mut headers = request.headers().clone();
        headers.retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE));
        headers.insert(
            CONTENT_TYPE.to_string(),
            mime::APPLICATION_JSON.essence_str().to_string(),
        );

        let context = session.create_context(ContextOptions {
            base_url: self.base_url.clone(),
            headers: headers.clone(),
        })?;

        let endpoint = if method.substitutes_path_params() {
            substitute(endpoint, request.path_params())?
        } else {
            endpoint.to_string()
        };
        let unresolved = unresolved_placeholders(&endpoint);
        if !unresolved.is_empty() {
            warn!(%method, %endpoint, ?unresolved, "endpoint still has placeholders");
        }

        let start = Instant::now();
        let response = Self::dispatch(context, method, &endpoint, request.options())?;
        let elapsed = ElapsedTime::new(start.elapsed());

        info!("Response time: {elapsed}");

        if self.report {
            self.reporter.attach_request(&RequestAttachment {
                url: response.url.clone(),
                method,
                headers,
                cookies: context.cookies(),
                body: (!request.body().is_empty())
                    .then(|| Value::Object(request.body().clone()).to_string()),
                recorded_at: Utc::now(),
            });
            self.reporter
                .attach_response(&ResponseAttachment::from_response(&response));
            self.reporter
                .attach_text(RESPONSE_TIME_ATTACHMENT, &elapsed.to_string());
            self.reporter.record_response_time(elapsed);
        }

        Ok(ExecutedRequest { response, elapsed })
    }

    fn dispatch<C: RequestContext>(
        context: &C,
        method: HttpMethod,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<ResponseSpec, ExecuteRequestError> {
        let response = match method {
            HttpMethod::Get => context.get(endpoint, options),
            HttpMethod::Post => context.post(endpoint, options),
            HttpMethod::Put => context.put(endpoint, options),
            HttpMethod::Patch => context.patch(endpoint, options),
            HttpMethod::Delete => context.delete(endpoint, options),
            HttpMethod::Head | HttpMethod::Options => {
                return Err(ExecuteRequestError::UnsupportedMethod(method));
            }
        };
        Ok(response?)
    }
}
