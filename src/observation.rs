use serde::{Deserialize, Serialize};

pub const SYNCHRONOUS_HANDLER_DETECTED: &str =
    "firetail.configuration.synchronous.handler.detected";
pub const NO_HANDLER_DETECTED: &str = "firetail.configuration.no.handler.detected";
pub const HANDLER_ERROR: &str = "firetail.handler.error";

/// A diagnostic notice about how the wrapper was used, attached to the log
/// record of the invocation it was detected in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
}

impl Observation {
    pub fn new<K: Into<String>, T: Into<String>>(kind: K, title: T) -> Self {
        Observation {
            kind: kind.into(),
            title: title.into(),
        }
    }

    pub fn synchronous_handler() -> Self {
        Observation::new(
            SYNCHRONOUS_HANDLER_DETECTED,
            "The wrapper has been called with a synchronous function",
        )
    }

    pub fn no_handler() -> Self {
        Observation::new(
            NO_HANDLER_DETECTED,
            "The wrapper has been called with an invalid argument",
        )
    }

    pub fn handler_error() -> Self {
        Observation::new(HANDLER_ERROR, "The handler returned an error")
    }
}
