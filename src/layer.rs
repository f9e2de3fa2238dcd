use crate::sink::{LogSink, StdoutSink};
use crate::wrapper::{event_to_value, settle};
use futures::future::{BoxFuture, FutureExt};
use lambda_runtime::tower::Layer;
use lambda_runtime::{Error, LambdaEvent, Service};
use serde::Serialize;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::SystemTime;

/// Adds firetail logging to an existing Lambda service.
///
/// The inner service is treated like an asynchronous handler: no observations
/// are recorded for it.
#[derive(Clone)]
pub struct FiretailLayer {
    sink: Arc<dyn LogSink>,
}

impl FiretailLayer {
    pub fn new() -> Self {
        FiretailLayer {
            sink: Arc::new(StdoutSink),
        }
    }

    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        FiretailLayer { sink }
    }
}

impl Default for FiretailLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for FiretailLayer {
    type Service = FiretailService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FiretailService {
            inner,
            sink: Arc::clone(&self.sink),
        }
    }
}

#[derive(Clone)]
pub struct FiretailService<S> {
    inner: S,
    sink: Arc<dyn LogSink>,
}

impl<S, E> Service<LambdaEvent<E>> for FiretailService<S>
where
    S: Service<LambdaEvent<E>> + 'static,
    S::Future: Send + 'static,
    S::Response: Serialize + Send + 'static,
    S::Error: Into<Error>,
    E: Serialize + 'static,
{
    type Response = S::Response;
    type Error = Error;
    type Future = BoxFuture<'static, Result<S::Response, Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: LambdaEvent<E>) -> Self::Future {
        let started_at = SystemTime::now();
        let event = event_to_value(&req.payload);
        let sink = Arc::clone(&self.sink);
        let fut = self.inner.call(req);

        async move {
            let outcome = fut.await.map_err(Into::into);
            settle(event, started_at, Vec::new(), &outcome, &*sink);
            outcome
        }
        .boxed()
    }
}
