//! Runs itself as a child process so the default stdout sink can be observed
//! from the outside.

use firetail_lambda::{decode_line, wrap_async, LOG_PREFIX};
use lambda_runtime::{Context, Error};
use serde_json::{json, Value};
use std::env;
use std::process::Command;

const CHILD_ENV: &str = "FIRETAIL_STDOUT_SINK_CHILD";

async fn run_child() {
    let wrapped = wrap_async(|event: Value, _ctx: Context| async move {
        Ok::<_, Error>(json!({"statusCode": 201, "body": event["name"].clone()}))
    });
    let result = wrapped
        .invoke(json!({"name": "stdout"}), Context::default())
        .await
        .unwrap();
    assert_eq!(result, json!({"statusCode": 201, "body": "stdout"}));
}

fn check_parent() {
    let exe = env::current_exe().unwrap();
    let output = Command::new(exe).env(CHILD_ENV, "1").output().unwrap();
    assert!(
        output.status.success(),
        "child failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with('\n'), "unterminated output {:?}", stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "expected one line, got {:?}", lines);
    assert!(lines[0].starts_with(LOG_PREFIX));

    let record = decode_line(lines[0]).unwrap();
    assert_eq!(record.event, json!({"name": "stdout"}));
    assert_eq!(record.response.status_code, json!(201));
    assert_eq!(record.response.body, Some(json!("stdout")));
    assert!(record.observations.is_empty());
}

fn main() {
    if env::var_os(CHILD_ENV).is_some() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(run_child());
        return;
    }

    check_parent();
    println!("stdout_sink: ok");
}
