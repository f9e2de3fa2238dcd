use crate::logger;
use crate::observation::Observation;
use crate::record::ExecutionRecord;
use crate::sink::{LogSink, StdoutSink};
use futures::future::{BoxFuture, FutureExt};
use lambda_runtime::{Context, Error, LambdaEvent, Service};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};
use std::time::SystemTime;

pub type AsyncHandlerFn<E, R> =
    dyn Fn(E, Context) -> BoxFuture<'static, Result<R, Error>> + Send + Sync;
pub type SyncHandlerFn<E, R> = dyn Fn(E, Context) -> Result<R, Error> + Send + Sync;
pub type MissingValueFn<R> = dyn Fn() -> R + Send + Sync;

/// What the wrapper was composed with.
pub enum Handler<E, R> {
    Async(Arc<AsyncHandlerFn<E, R>>),
    /// Runs to completion inside the invocation; reported as an observation.
    Sync(Arc<SyncHandlerFn<E, R>>),
    /// No handler at all. A copy of the value is returned as the result of
    /// every invocation and the misconfiguration is reported.
    Missing(Arc<MissingValueFn<R>>),
}

impl<E, R> Handler<E, R> {
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(E, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Error>> + Send + 'static,
    {
        Handler::Async(Arc::new(
            move |event: E, context: Context| -> BoxFuture<'static, Result<R, Error>> {
                f(event, context).boxed()
            },
        ))
    }

    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(E, Context) -> Result<R, Error> + Send + Sync + 'static,
    {
        Handler::Sync(Arc::new(f))
    }

    pub fn missing(value: R) -> Self
    where
        R: Clone + Send + Sync + 'static,
    {
        Handler::Missing(Arc::new(move || value.clone()))
    }
}

impl<E, R> Clone for Handler<E, R> {
    fn clone(&self) -> Self {
        match self {
            Handler::Async(f) => Handler::Async(Arc::clone(f)),
            Handler::Sync(f) => Handler::Sync(Arc::clone(f)),
            Handler::Missing(f) => Handler::Missing(Arc::clone(f)),
        }
    }
}

/// A handler wrapped with firetail logging. Implements `Service` so it can be
/// handed straight to `lambda_runtime::run`.
pub struct Firetail<E, R> {
    handler: Handler<E, R>,
    sink: Arc<dyn LogSink>,
}

impl<E, R> Clone for Firetail<E, R> {
    fn clone(&self) -> Self {
        Firetail {
            handler: self.handler.clone(),
            sink: Arc::clone(&self.sink),
        }
    }
}

pub fn wrap_async<E, R, F, Fut>(f: F) -> Firetail<E, R>
where
    F: Fn(E, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
{
    Firetail::new(Handler::from_async(f))
}

pub fn wrap_sync<E, R, F>(f: F) -> Firetail<E, R>
where
    F: Fn(E, Context) -> Result<R, Error> + Send + Sync + 'static,
{
    Firetail::new(Handler::from_sync(f))
}

pub fn wrap_value<E, R>(value: R) -> Firetail<E, R>
where
    R: Clone + Send + Sync + 'static,
{
    Firetail::new(Handler::missing(value))
}

impl<E, R> Firetail<E, R> {
    pub fn new(handler: Handler<E, R>) -> Self {
        Firetail {
            handler,
            sink: Arc::new(StdoutSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl<E, R> Firetail<E, R>
where
    E: Serialize,
    R: Serialize,
{
    /// Runs one invocation: calls the handler, logs exactly one record and
    /// hands back the handler's result untouched.
    pub async fn invoke(&self, event: E, context: Context) -> Result<R, Error> {
        let started_at = SystemTime::now();
        let mut observations = Vec::new();
        let logged_event = event_to_value(&event);

        let outcome = match &self.handler {
            Handler::Async(f) => f(event, context).await,
            Handler::Sync(f) => {
                observations.push(Observation::synchronous_handler());
                f(event, context)
            }
            Handler::Missing(value) => {
                observations.push(Observation::no_handler());
                Ok(value())
            }
        };

        settle(logged_event, started_at, observations, &outcome, &*self.sink);
        outcome
    }
}

impl<E, R> Service<LambdaEvent<E>> for Firetail<E, R>
where
    E: Serialize + Send + 'static,
    R: Serialize + Send + 'static,
{
    type Response = R;
    type Error = Error;
    type Future = BoxFuture<'static, Result<R, Error>>;

    fn poll_ready(&mut self, _cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: LambdaEvent<E>) -> Self::Future {
        let this = self.clone();
        async move { this.invoke(req.payload, req.context).await }.boxed()
    }
}

pub(crate) fn event_to_value<E: Serialize>(event: &E) -> Value {
    serde_json::to_value(event).unwrap_or_else(|e| {
        log::warn!("Failed to serialize invocation event, logging null: {}", e);
        Value::Null
    })
}

/// Builds the execution record for a settled invocation and logs it.
pub(crate) fn settle<R: Serialize>(
    event: Value,
    started_at: SystemTime,
    observations: Vec<Observation>,
    outcome: &Result<R, Error>,
    sink: &dyn LogSink,
) {
    let finished_at = SystemTime::now();
    let record = match outcome {
        Ok(response) => match serde_json::to_value(response) {
            Ok(response) => {
                ExecutionRecord::from_response(&response, started_at, finished_at, observations)
            }
            Err(e) => {
                log::warn!("Failed to serialize handler response: {}", e);
                ExecutionRecord::from_response(&Value::Null, started_at, finished_at, observations)
            }
        },
        Err(e) => ExecutionRecord::from_error(&**e, started_at, finished_at, observations),
    };
    logger::log(event, &record, sink);
}
