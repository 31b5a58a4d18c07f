//! Parallel scenario runner.
//!
//! Scenarios are pulled from a shared queue by a fixed pool of worker
//! threads. Each scenario gets a fresh engine wrapped in its own
//! [`ApiSession`], which is closed when the scenario returns or panics.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, PoisonError};

use apicheck_application::ports::{HttpEngine, TransportError};
use apicheck_application::{ApiSession, ApplicationResult};
use tracing::{error, info, warn};

use crate::config::HarnessConfig;

type ScenarioBody<E> = Box<dyn FnOnce(ApiSession<E>) -> ApplicationResult<()> + Send>;

/// A named unit of work run against its own session.
pub struct Scenario<E: HttpEngine> {
    name: String,
    body: ScenarioBody<E>,
}

impl<E: HttpEngine> Scenario<E> {
    /// Creates a scenario.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: FnOnce(ApiSession<E>) -> ApplicationResult<()> + Send + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E: HttpEngine> fmt::Debug for Scenario<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Scenario name.
    pub name: String,
    /// Whether the scenario completed without error or panic.
    pub passed: bool,
    /// Error or panic message for failed scenarios.
    pub failure: Option<String>,
    /// Index of the worker that ran it.
    pub worker: usize,
}

impl ScenarioOutcome {
    fn passed(name: String, worker: usize) -> Self {
        Self {
            name,
            passed: true,
            failure: None,
            worker,
        }
    }

    fn failed(name: String, worker: usize, failure: String) -> Self {
        Self {
            name,
            passed: false,
            failure: Some(failure),
            worker,
        }
    }
}

/// Runs scenarios on a pool of worker threads.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioRunner {
    workers: usize,
}

impl ScenarioRunner {
    /// Creates a runner with `workers` threads (at least one).
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Creates a runner sized by the scenario thread count.
    #[must_use]
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.worker_count())
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Runs every scenario and returns the outcomes in input order.
    ///
    /// `engine_factory` is called on the worker thread once per scenario.
    /// A factory error fails that scenario without running it.
    pub fn run<E, F>(&self, scenarios: Vec<Scenario<E>>, engine_factory: F) -> Vec<ScenarioOutcome>
    where
        E: HttpEngine,
        F: Fn() -> Result<E, TransportError> + Sync,
    {
        let total = scenarios.len();
        let queue = Mutex::new(scenarios.into_iter().enumerate().collect::<VecDeque<_>>());
        let workers = self.workers.min(total.max(1));
        info!(scenarios = total, workers, "running scenarios");

        let mut outcomes: Vec<(usize, ScenarioOutcome)> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let queue = &queue;
                    let engine_factory = &engine_factory;
                    scope.spawn(move || {
                        let mut done = Vec::new();
                        while let Some((index, scenario)) = next(queue) {
                            done.push((index, run_one(worker, scenario, engine_factory)));
                        }
                        done
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        error!("scenario worker terminated unexpectedly");
                        Vec::new()
                    })
                })
                .collect()
        });

        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}

fn next<T>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
}

fn run_one<E, F>(worker: usize, scenario: Scenario<E>, engine_factory: &F) -> ScenarioOutcome
where
    E: HttpEngine,
    F: Fn() -> Result<E, TransportError>,
{
    let Scenario { name, body } = scenario;

    let engine = match engine_factory() {
        Ok(engine) => engine,
        Err(e) => {
            warn!(scenario = %name, worker, error = %e, "failed to start engine");
            return ScenarioOutcome::failed(name, worker, e.to_string());
        }
    };

    let session = ApiSession::open(engine);
    match catch_unwind(AssertUnwindSafe(|| body(session))) {
        Ok(Ok(())) => {
            info!(scenario = %name, worker, "scenario passed");
            ScenarioOutcome::passed(name, worker)
        }
        Ok(Err(e)) => {
            warn!(scenario = %name, worker, error = %e, "scenario failed");
            ScenarioOutcome::failed(name, worker, e.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(scenario = %name, worker, error = %message, "scenario panicked");
            ScenarioOutcome::failed(name, worker, message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "scenario panicked".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use apicheck_application::ApplicationError;
    use apicheck_application::ports::{ContextOptions, RequestContext};
    use apicheck_domain::{HttpMethod, RequestOptions, ResponseSpec};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingEngine {
        closed: Arc<AtomicUsize>,
    }

    struct NullContext;

    impl RequestContext for NullContext {
        fn id(&self) -> &str {
            "null"
        }

        fn fetch(
            &self,
            _method: HttpMethod,
            _endpoint: &str,
            _options: &RequestOptions,
        ) -> Result<ResponseSpec, TransportError> {
            Ok(ResponseSpec::new(204, HashMap::new(), Vec::new(), Duration::ZERO))
        }

        fn dispose(&mut self) {}
    }

    impl HttpEngine for CountingEngine {
        type Context = NullContext;

        fn new_context(&self, _options: ContextOptions) -> Result<NullContext, TransportError> {
            Ok(NullContext)
        }

        fn close(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_outcomes_in_input_order_with_failures_isolated() {
        let closed = Arc::new(AtomicUsize::new(0));
        let scenarios: Vec<Scenario<CountingEngine>> = vec![
            Scenario::new("ok", |mut session| {
                session
                    .create_context(ContextOptions::default())
                    .map_err(|e| ApplicationError::Execute(e.into()))?;
                Ok(())
            }),
            Scenario::new("error", |_session| Err(ApplicationError::NoResponse)),
            Scenario::new("panic", |_session| panic!("boom")),
            Scenario::new("ok again", |_session| Ok(())),
        ];

        let runner = ScenarioRunner::new(2);
        let outcomes = runner.run(scenarios, || {
            Ok(CountingEngine {
                closed: Arc::clone(&closed),
            })
        });

        let names: Vec<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["ok", "error", "panic", "ok again"]);
        let passed: Vec<_> = outcomes.iter().map(|o| o.passed).collect();
        assert_eq!(passed, vec![true, false, false, true]);
        assert_eq!(outcomes[2].failure.as_deref(), Some("boom"));
        assert!(outcomes.iter().all(|o| o.worker < 2));
        assert_eq!(closed.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_factory_error_fails_scenario() {
        let scenarios: Vec<Scenario<CountingEngine>> =
            vec![Scenario::new("never runs", |_session| Ok(()))];

        let outcomes = ScenarioRunner::new(1)
            .run(scenarios, || Err(TransportError::Other("no runtime".to_string())));

        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].passed);
        assert!(outcomes[0].failure.as_deref().unwrap().contains("no runtime"));
    }

    #[test]
    fn test_worker_count_is_at_least_one() {
        assert_eq!(ScenarioRunner::new(0).workers(), 1);
        let config = HarnessConfig {
            scenario_thread_count: Some(5),
            ..HarnessConfig::default()
        };
        assert_eq!(ScenarioRunner::from_config(&config).workers(), 5);
    }

    #[test]
    fn test_empty_run() {
        let outcomes = ScenarioRunner::new(4).run(Vec::<Scenario<CountingEngine>>::new(), || {
            Ok(CountingEngine {
                closed: Arc::new(AtomicUsize::new(0)),
            })
        });
        assert!(outcomes.is_empty());
    }
}
