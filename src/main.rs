use firetail_lambda::{decode_line, is_log_line, LogExtension};
use std::error::Error;
use std::io::{self, BufRead};
use std::path::Path;
use std::process;
use std::time::Duration;
use structopt::StructOpt;

mod logs;
mod util;

/// Decodes firetail log records, from stdin or straight from CloudWatch
#[derive(StructOpt, Debug)]
#[structopt(name = "firetail-logs")]
enum Opt {
    /// Decode firetail:log-ext lines read from stdin, skipping everything else
    Decode {
        /// Print each record on a single line
        #[structopt(long)]
        compact: bool,
    },
    /// Tail a deployed function's CloudWatch logs and decode its records
    Tail(TailOpt),
}

#[derive(StructOpt, Debug)]
pub(crate) struct TailOpt {
    /// AWS Access Key
    #[structopt(long)]
    access_key: Option<String>,
    /// AWS Secret Key
    #[structopt(long)]
    secret_key: Option<String>,
    /// Full ARN of the function or its configuration key in table [arns] in Lambda.toml
    /// (e.g. arn:aws:lambda:eu-north-1:1234:function:MyLambdaFunc)
    #[structopt(name = "FUNCTION_ARN")]
    arn: String,
    /// How far back to start reading, in minutes
    #[structopt(long, default_value = "5")]
    since_minutes: u64,
    /// Print each record on a single line
    #[structopt(long)]
    compact: bool,
}

pub(crate) fn render(record: &LogExtension, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(record)
    } else {
        serde_json::to_string_pretty(record)
    }
}

fn since_duration(minutes: u64) -> Result<Duration, String> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("--since-minutes {} is too large", minutes))
}

fn decode_stdin(compact: bool) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    let mut decoded = 0;
    for line in stdin.lock().lines() {
        let line = line?;
        if !is_log_line(&line) {
            continue;
        }
        match decode_line(&line) {
            Ok(record) => {
                println!("{}", render(&record, compact)?);
                decoded += 1;
            }
            Err(e) => log::warn!("Skipping malformed record: {}", e),
        }
    }
    log::info!("Decoded {} firetail records", decoded);
    Ok(())
}

async fn tail(opt: TailOpt) -> Result<(), Box<dyn Error>> {
    let (region, func_name) = util::parse_arn_or_key(&opt.arn, Path::new(util::CONFIG_FILE))?;
    log::info!("Tailing firetail records of {} in {}", func_name, region);

    let since = since_duration(opt.since_minutes)?;
    let client = logs::create_client(&opt, &region)?;
    logs::tail(&client, &func_name, since, opt.compact).await
}

#[tokio::main]
async fn main() {
    if let Err(e) = simple_logger::init_with_level(log::Level::Info) {
        eprintln!("Failed to init logger: {}", e);
    }

    let result = match Opt::from_args() {
        Opt::Decode { compact } => decode_stdin(compact),
        Opt::Tail(opt) => tail(opt).await,
    };

    if let Err(e) = result {
        eprintln!("firetail-logs failed:\n{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::SystemTime;

    #[test]
    fn compact_render_is_single_line() {
        let now = SystemTime::now();
        let record = firetail_lambda::ExecutionRecord::from_response(&json!({}), now, now, vec![]);
        let ext = LogExtension::new(json!({"k": "v"}), &record);

        let compact = render(&ext, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(render(&ext, false).unwrap().contains('\n'));
    }

    #[test]
    fn since_minutes_overflow_is_an_error() {
        assert_eq!(since_duration(15).unwrap(), Duration::from_secs(900));
        assert!(since_duration(u64::MAX).is_err());
    }

    #[test]
    fn parses_tail_arguments() {
        let opt = Opt::from_iter(&["firetail-logs", "tail", "prod", "--since-minutes", "15"]);
        match opt {
            Opt::Tail(tail) => {
                assert_eq!(tail.arn, "prod");
                assert_eq!(tail.since_minutes, 15);
                assert!(!tail.compact);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
