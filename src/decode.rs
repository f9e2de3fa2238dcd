use crate::logger::{LogExtension, LOG_PREFIX};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("line does not contain the {} marker", LOG_PREFIX)]
    MissingPrefix,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid log record: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn is_log_line(line: &str) -> bool {
    line.contains(LOG_PREFIX)
}

/// Decodes a record line. Anything before the marker (CloudWatch adds a
/// timestamp and request id) is ignored.
pub fn decode_line(line: &str) -> Result<LogExtension, DecodeError> {
    let start = line.find(LOG_PREFIX).ok_or(DecodeError::MissingPrefix)?;
    let payload = line[start + LOG_PREFIX.len()..].trim();
    let json = STANDARD.decode(payload)?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Observation;
    use crate::record::ExecutionRecord;
    use serde_json::json;
    use std::time::SystemTime;

    fn sample_line() -> String {
        let now = SystemTime::now();
        let record = ExecutionRecord::from_response(
            &json!({"statusCode": 200, "body": "hi"}),
            now,
            now,
            vec![Observation::no_handler()],
        );
        LogExtension::new(json!({"path": "/"}), &record).to_line().unwrap()
    }

    #[test]
    fn decodes_cloudwatch_message() {
        let line = format!(
            "2024-01-01T00:00:00.000Z\t8f5e7a4c-0000-4000-8000-000000000000\tINFO\t{}\n",
            sample_line()
        );
        assert!(is_log_line(&line));
        let ext = decode_line(&line).unwrap();
        assert_eq!(ext.event, json!({"path": "/"}));
        assert_eq!(ext.response.body, Some(json!("hi")));
        assert_eq!(ext.observations, vec![Observation::no_handler()]);
    }

    #[test]
    fn rejects_unmarked_line() {
        assert!(!is_log_line("START RequestId: abc"));
        assert!(matches!(
            decode_line("START RequestId: abc"),
            Err(DecodeError::MissingPrefix)
        ));
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(matches!(
            decode_line("firetail:log-ext:not base64!"),
            Err(DecodeError::Base64(_))
        ));
        let not_a_record = format!("firetail:log-ext:{}", STANDARD.encode("[1,2]"));
        assert!(matches!(decode_line(&not_a_record), Err(DecodeError::Json(_))));
    }
}
