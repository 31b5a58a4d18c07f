//! HTTP engine implementation using reqwest.
//!
//! This adapter implements the `HttpEngine` port. Each engine owns a
//! current-thread tokio runtime and drives reqwest on it, so callers get a
//! blocking API: `fetch` returns once the response body has been read.
//! An engine must not be used from inside another tokio runtime.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use apicheck_application::ports::{ContextOptions, HttpEngine, RequestContext, TransportError};
use apicheck_domain::{HttpMethod, RequestOptions, ResponseSpec, generate_id_v7};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use reqwest::{Client, Method};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP engine backed by `reqwest::Client`.
pub struct ReqwestEngine {
    client: Client,
    runtime: Option<Arc<Runtime>>,
    timeout: Duration,
}

impl ReqwestEngine {
    /// Creates an engine with default settings.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime or the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates an engine with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime or the client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("apicheck/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Self::with_client(client, timeout)
    }

    /// Creates an engine around a custom reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be created.
    pub fn with_client(client: Client, timeout: Duration) -> Result<Self, TransportError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransportError::Other(format!("failed to start runtime: {e}")))?;

        Ok(Self {
            client,
            runtime: Some(Arc::new(runtime)),
            timeout,
        })
    }

    /// Returns true once the engine has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.runtime.is_none()
    }

    fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, TransportError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Other(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Other(format!("invalid header value for '{name}': {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

impl HttpEngine for ReqwestEngine {
    type Context = ReqwestContext;

    fn new_context(&self, options: ContextOptions) -> Result<ReqwestContext, TransportError> {
        let runtime = self.runtime.as_ref().ok_or(TransportError::Disposed)?;
        let base_url = Url::parse(&options.base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", options.base_url)))?;

        Ok(ReqwestContext {
            id: generate_id_v7(),
            client: self.client.clone(),
            runtime: Arc::clone(runtime),
            base_url,
            headers: Self::header_map(&options.headers)?,
            timeout: self.timeout,
            disposed: false,
        })
    }

    fn close(&mut self) {
        self.runtime = None;
    }
}

/// A request context: base URL and default headers on a shared client.
pub struct ReqwestContext {
    id: String,
    client: Client,
    runtime: Arc<Runtime>,
    base_url: Url,
    headers: HeaderMap,
    timeout: Duration,
    disposed: bool,
}

impl ReqwestContext {
    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Resolves an endpoint against the base URL and appends the query.
    ///
    /// Absolute endpoints are used as-is; relative ones follow URL join
    /// rules, so `/users` replaces the base path while `users` extends it.
    fn resolve(&self, endpoint: &str, options: &RequestOptions) -> Result<Url, TransportError> {
        let mut url = Url::parse(endpoint)
            .or_else(|_| self.base_url.join(endpoint))
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {endpoint}")))?;

        if !options.query().is_empty() {
            url.query_pairs_mut().extend_pairs(options.query_pairs());
        }
        Ok(url)
    }

    /// Flattens response headers, joining repeated values in arrival order.
    ///
    /// `Set-Cookie` values are joined with `; `, everything else with `, `.
    fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
        let mut collected: HashMap<String, String> = HashMap::with_capacity(headers.keys_len());
        for (name, value) in headers {
            let value = value.to_str().unwrap_or("<binary>");
            collected
                .entry(name.to_string())
                .and_modify(|joined| {
                    joined.push_str(if *name == SET_COOKIE { "; " } else { ", " });
                    joined.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        collected
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            #[allow(clippy::cast_possible_truncation)]
            return TransportError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            };
        }
        if error.is_connect() {
            return TransportError::ConnectionFailed(error.to_string());
        }
        TransportError::Other(error.to_string())
    }
}

impl RequestContext for ReqwestContext {
    fn id(&self) -> &str {
        &self.id
    }

    fn fetch(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<ResponseSpec, TransportError> {
        if self.disposed {
            return Err(TransportError::Disposed);
        }

        let url = self.resolve(endpoint, options)?;
        debug!(context_id = %self.id, %method, %url, "dispatching request");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(method), url)
            .headers(self.headers.clone())
            .timeout(self.timeout);

        if let Some(data) = options.data() {
            builder = builder.json(data);
        }

        let timeout = self.timeout;
        self.runtime.block_on(async move {
            let start = Instant::now();

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout))?;

            let status = response.status();
            let final_url = response.url().to_string();
            let headers = Self::collect_headers(response.headers());

            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Other(format!("Failed to read body: {e}")))?
                .to_vec();

            Ok::<_, TransportError>(
                ResponseSpec::new(status.as_u16(), headers, body, start.elapsed())
                    .with_url(final_url)
                    .with_status_text(status.canonical_reason().unwrap_or_default()),
            )
        })
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }
}
