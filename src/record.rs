use crate::observation::Observation;
use serde_json::Value;
use std::fmt::Display;
use std::time::SystemTime;

const DEFAULT_STATUS_CODE: u16 = 200;
const ERROR_STATUS_CODE: u16 = 500;

/// Everything captured about a single invocation. Built once the handler has
/// settled and consumed by the logger.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    pub status_code: Value,
    pub body: Option<Value>,
    pub started_at: SystemTime,
    pub finished_at: SystemTime,
    pub observations: Vec<Observation>,
}

impl ExecutionRecord {
    /// Pulls `statusCode` and `body` out of a handler response. A missing or
    /// falsy status code becomes 200; a response that isn't an object has no
    /// body at all.
    pub fn from_response(
        response: &Value,
        started_at: SystemTime,
        finished_at: SystemTime,
        observations: Vec<Observation>,
    ) -> Self {
        let status_code = match response.get("statusCode") {
            Some(code) if !is_falsy(code) => code.clone(),
            _ => Value::from(DEFAULT_STATUS_CODE),
        };

        ExecutionRecord {
            status_code,
            body: response.get("body").cloned(),
            started_at,
            finished_at,
            observations,
        }
    }

    pub fn from_error<E: Display + ?Sized>(
        error: &E,
        started_at: SystemTime,
        finished_at: SystemTime,
        mut observations: Vec<Observation>,
    ) -> Self {
        observations.push(Observation::handler_error());

        ExecutionRecord {
            status_code: Value::from(ERROR_STATUS_CODE),
            body: Some(Value::String(error.to_string())),
            started_at,
            finished_at,
            observations,
        }
    }

    /// Milliseconds between start and finish, zero if the clock went backwards.
    pub fn execution_time(&self) -> u64 {
        self.finished_at
            .duration_since(self.started_at)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
