//! Firetail logging for AWS Lambda handlers.
//!
//! Wrap a handler and every invocation writes exactly one line to stdout:
//!
//! ```text
//! firetail:log-ext:<base64 encoded JSON record>
//! ```
//!
//! The record carries the event, the response's `statusCode` and `body`, the
//! execution time in milliseconds and any observations about how the wrapper
//! was set up. The handler's result is returned to the runtime unchanged.
//!
//! ```no_run
//! use lambda_runtime::{Context, Error};
//! use serde_json::{json, Value};
//!
//! async fn handler(event: Value, _context: Context) -> Result<Value, Error> {
//!     Ok(json!({ "statusCode": 200, "body": event }))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     lambda_runtime::run(firetail_lambda::wrap_async(handler)).await
//! }
//! ```

pub mod decode;
pub mod layer;
pub mod logger;
pub mod observation;
pub mod record;
pub mod sink;
pub mod wrapper;

pub use decode::{decode_line, is_log_line, DecodeError};
pub use layer::{FiretailLayer, FiretailService};
pub use logger::{LogExtension, LOG_PREFIX};
pub use observation::Observation;
pub use record::ExecutionRecord;
pub use sink::{LogSink, MemorySink, StdoutSink};
pub use wrapper::{wrap_async, wrap_sync, wrap_value, Firetail, Handler};
