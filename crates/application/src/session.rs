//! Worker-scoped ownership of an HTTP engine and its request contexts.

use tracing::debug;

use crate::ports::{ContextOptions, HttpEngine, RequestContext, TransportError};

/// Owns one worker's HTTP engine and every request context it created.
///
/// The runner opens a session before a scenario and closes it afterwards:
/// [`close`](Self::close) disposes each registered context exactly once and
/// then closes the engine. Dropping an open session closes it too.
pub struct ApiSession<E: HttpEngine> {
    engine: E,
    contexts: Vec<E::Context>,
    closed: bool,
}

impl<E: HttpEngine> ApiSession<E> {
    /// Acquires the engine for this worker.
    #[must_use]
    pub fn open(engine: E) -> Self {
        Self {
            engine,
            contexts: Vec::new(),
            closed: false,
        }
    }

    /// The underlying engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Creates a request context and registers it for disposal.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Disposed`] once the session is closed, or
    /// whatever the engine reports.
    pub fn create_context(&mut self, options: ContextOptions) -> Result<&E::Context, TransportError> {
        if self.closed {
            return Err(TransportError::Disposed);
        }
        let context = self.engine.new_context(options)?;
        debug!(context_id = context.id(), "request context created");
        Ok(self.register_context(context))
    }

    /// Registers a context created elsewhere so the session disposes it.
    pub fn register_context(&mut self, context: E::Context) -> &E::Context {
        let index = self.contexts.len();
        self.contexts.push(context);
        &self.contexts[index]
    }

    /// Number of contexts awaiting disposal.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Disposes every registered context, returning how many were disposed.
    pub fn dispose_contexts(&mut self) -> usize {
        let count = self.contexts.len();
        for mut context in self.contexts.drain(..) {
            context.dispose();
            debug!(context_id = context.id(), "request context disposed");
        }
        count
    }

    /// Disposes the contexts and closes the engine. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.dispose_contexts();
        self.engine.close();
        self.closed = true;
        debug!("http engine closed");
    }

    /// Returns true once [`close`](Self::close) has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<E: HttpEngine> Drop for ApiSession<E> {
    fn drop(&mut self) {
        self.close();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeEngine;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contexts_are_disposed_once_on_close() {
        let (engine, journal) = FakeEngine::new(200, "{}");
        let mut session = ApiSession::open(engine);

        session.create_context(ContextOptions::default()).map(|_| ()).ok();
        session.create_context(ContextOptions::default()).map(|_| ()).ok();
        assert_eq!(session.context_count(), 2);

        session.close();
        session.close();

        let journal = journal.borrow();
        assert_eq!(journal.disposed, vec!["ctx-1".to_string(), "ctx-2".to_string()]);
        assert_eq!(journal.engine_closed, 1);
    }

    #[test]
    fn test_closed_session_refuses_new_contexts() {
        let (engine, _journal) = FakeEngine::new(200, "{}");
        let mut session = ApiSession::open(engine);
        session.close();

        let result = session.create_context(ContextOptions::default()).map(|_| ());
        assert_eq!(result, Err(TransportError::Disposed));
    }

    #[test]
    fn test_drop_closes_session() {
        let (engine, journal) = FakeEngine::new(200, "{}");
        {
            let mut session = ApiSession::open(engine);
            session.create_context(ContextOptions::default()).map(|_| ()).ok();
        }
        let journal = journal.borrow();
        assert_eq!(journal.disposed.len(), 1);
        assert_eq!(journal.engine_closed, 1);
    }
}
