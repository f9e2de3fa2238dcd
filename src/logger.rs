use crate::observation::Observation;
use crate::record::ExecutionRecord;
use crate::sink::LogSink;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker every record line starts with.
pub const LOG_PREFIX: &str = "firetail:log-ext:";

pub const LIBRARY_TYPE: &str = "Lambda wrapper";
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const LIBRARY_LANGUAGE: &str = "Rust";

/// The JSON document carried, base64 encoded, by each record line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogExtension {
    pub event: Value,
    pub response: LoggedResponse,
    pub execution_time: u64,
    pub observations: Vec<Observation>,
    pub metadata: Metadata,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggedResponse {
    pub status_code: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub library_type: String,
    pub library_version: String,
    pub library_language: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            library_type: LIBRARY_TYPE.to_owned(),
            library_version: LIBRARY_VERSION.to_owned(),
            library_language: LIBRARY_LANGUAGE.to_owned(),
        }
    }
}

impl LogExtension {
    pub fn new(event: Value, record: &ExecutionRecord) -> Self {
        LogExtension {
            event,
            response: LoggedResponse {
                status_code: record.status_code.clone(),
                body: record.body.clone(),
            },
            execution_time: record.execution_time(),
            observations: record.observations.clone(),
            metadata: Metadata::default(),
        }
    }

    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(format!("{}{}", LOG_PREFIX, STANDARD.encode(json)))
    }
}

/// Emits the record for one invocation. Never fails from the caller's point
/// of view; problems are reported through the `log` facade.
pub fn log(event: Value, record: &ExecutionRecord, sink: &dyn LogSink) {
    for observation in &record.observations {
        log::debug!("firetail observation {}: {}", observation.kind, observation.title);
    }

    match LogExtension::new(event, record).to_line() {
        Ok(line) => sink.write_line(&line),
        Err(e) => log::warn!("Failed to serialize firetail log record: {}", e),
    }
}
