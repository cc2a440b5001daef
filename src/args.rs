use std::env;
use structopt::StructOpt;

/// Default cluster address when neither the flag nor the env is given
pub const DEFAULT_ELASTICSEARCH_ADDR: &str = "http://localhost:9200";

/// Purge old time-partitioned indices from elasticsearch
#[derive(StructOpt, Debug)]
#[structopt(name = "logclean")]
pub struct Opt {
    // The number of occurrences of the `v/verbose` flag
    /// Verbose mode (-v, -vv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,

    /// Sets maximum log entry age in days
    #[structopt(short, long, default_value = "30")]
    pub age: u32,

    /// Logs output to syslog
    #[structopt(short, long)]
    pub log: bool,

    /// Elasticsearch address, or use ELASTICSEARCH_ADDR env
    #[structopt(short = "e", long)]
    pub elasticsearch_addr: Option<String>,

    /// Request timeout in seconds
    #[structopt(short, long, default_value = "30")]
    pub timeout: u64,

    /// Maximum number of delete requests in flight, unbounded if not set
    #[structopt(short = "c", long)]
    pub max_concurrency: Option<usize>,

    /// Index family to clean, i.e `logstash` for `logstash-2021.05.11`
    pub index: Option<String>,
}

impl Opt {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

pub fn value_or_env(
    key: &str, other: Option<String>,
) -> anyhow::Result<String> {
    match other {
        Some(v) => Ok(v),
        None => match env::var(key) {
            Ok(v) => Ok(v),
            Err(e) => {
                let context = format!("{} must be set", key);
                Err(anyhow::Error::new(e).context(context))
            }
        },
    }
}

/// Render the help text, so it can go wherever the logs go.
pub fn usage() -> anyhow::Result<String> {
    let mut help = Vec::new();
    Opt::clap().write_long_help(&mut help)?;
    Ok(String::from_utf8_lossy(&help).into_owned())
}

/// Like [`value_or_env`], falling back to `default` when neither is set.
pub fn value_or_env_or(
    key: &str, other: Option<String>, default: &str,
) -> String {
    value_or_env(key, other).unwrap_or_else(|_| default.to_string())
}
