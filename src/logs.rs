use crate::TailOpt;
use firetail_lambda::decode_line;
use rusoto_core::credential::{DefaultCredentialsProvider, StaticProvider};
use rusoto_core::{HttpClient, Region};
use rusoto_logs::{CloudWatchLogs, CloudWatchLogsClient, FilterLogEventsRequest};
use std::collections::HashSet;
use std::error::Error;
use std::str::FromStr;
use std::time::{Duration, SystemTime};

const FILTER_PATTERN: &str = "\"firetail:log-ext\"";
const POLL_INTERVAL: Duration = Duration::from_millis(3000);

pub(crate) fn create_client(
    opt: &TailOpt,
    region: &str,
) -> Result<CloudWatchLogsClient, Box<dyn Error>> {
    let dispatcher = HttpClient::new()?;
    let region = Region::from_str(region)?;

    let client = match (&opt.access_key, &opt.secret_key) {
        (Some(access_key), Some(secret_key)) => {
            let creds = StaticProvider::new_minimal(access_key.to_owned(), secret_key.to_owned());
            CloudWatchLogsClient::new_with(dispatcher, creds, region)
        }
        _ => {
            let creds = DefaultCredentialsProvider::new()?;
            CloudWatchLogsClient::new_with(dispatcher, creds, region)
        }
    };
    Ok(client)
}

/// Unix milliseconds of `now - since`, clamped to the epoch.
fn start_millis(now: SystemTime, since: Duration) -> i64 {
    now.checked_sub(since)
        .unwrap_or(SystemTime::UNIX_EPOCH)
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Polls the function's log group forever, printing every firetail record
/// that shows up.
pub async fn tail(
    logs_client: &CloudWatchLogsClient,
    function_name: &str,
    since: Duration,
    compact: bool,
) -> Result<(), Box<dyn Error>> {
    let log_group_name = format!("/aws/lambda/{}", function_name);
    let mut next_token = None;
    let mut start_time = Some(start_millis(SystemTime::now(), since));
    let mut seen = HashSet::new();

    loop {
        let input = FilterLogEventsRequest {
            filter_pattern: Some(FILTER_PATTERN.to_owned()),
            limit: Some(10000),
            log_group_name: log_group_name.clone(),
            next_token: next_token.clone(),
            start_time,
            ..Default::default()
        };

        let res = logs_client.filter_log_events(input).await?;

        for event in res.events.unwrap_or_default() {
            let (id, message) = match (event.event_id, event.message) {
                (Some(id), Some(message)) => (id, message),
                _ => continue,
            };
            if !seen.insert(id) {
                continue;
            }
            match decode_line(&message) {
                Ok(record) => println!("{}", crate::render(&record, compact)?),
                Err(e) => log::warn!("Skipping undecodable record: {}", e),
            }
        }

        next_token = res.next_token;

        if next_token.is_none() {
            start_time = Some(start_millis(SystemTime::now(), since));
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
