use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "Lambda.toml";

#[derive(Debug, Error)]
pub enum ArnError {
    #[error("malformed Lambda function ARN: {0}")]
    Malformed(String),
    #[error("no key {key} in table [arns] of {path}")]
    UnknownKey { key: String, path: String },
    #[error("can't read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("can't parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize)]
struct LambdaConfig {
    #[serde(default)]
    arns: HashMap<String, String>,
}

/// Resolves a full function ARN, or a key in the `[arns]` table of the config
/// file, to `(region, function name)`.
pub fn parse_arn_or_key(arn_or_key: &str, config: &Path) -> Result<(String, String), ArnError> {
    if arn_or_key.starts_with("arn:") {
        return parse_arn(arn_or_key);
    }

    let path = config.display().to_string();
    let contents = fs::read_to_string(config).map_err(|source| ArnError::Read {
        path: path.clone(),
        source,
    })?;
    let config: LambdaConfig = toml::from_str(&contents).map_err(|source| ArnError::Parse {
        path: path.clone(),
        source,
    })?;

    match config.arns.get(arn_or_key) {
        Some(arn) => parse_arn(arn),
        None => Err(ArnError::UnknownKey {
            key: arn_or_key.to_owned(),
            path,
        }),
    }
}

// arn:aws:lambda:<region>:<account>:function:<name>[:<qualifier>]
fn parse_arn(arn: &str) -> Result<(String, String), ArnError> {
    let parts: Vec<&str> = arn.split(':').collect();
    match parts.as_slice() {
        ["arn", _, "lambda", region, _, "function", name, ..]
            if !region.is_empty() && !name.is_empty() && parts.len() <= 8 =>
        {
            Ok((region.to_string(), name.to_string()))
        }
        _ => Err(ArnError::Malformed(arn.to_owned())),
    }
}
