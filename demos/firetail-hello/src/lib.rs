use lambda_runtime::{Context, Error};
use serde_json::{json, Value};

pub async fn handler(value: Value, _context: Context) -> Result<Value, Error> {
    log::info!("Logging from lambda");
    Ok(json!({
        "statusCode": 200,
        "body": {
            "ok": true,
            "input": value
        }
    }))
}
