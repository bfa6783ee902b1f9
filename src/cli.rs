//! Command-line arguments and logging setup for the binary.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use s3_suffix_walk::{ClientConfig, Pagination, SuffixSet, WalkOptions};

/// Recursively list objects in an S3 bucket whose keys end with given suffixes.
///
/// Prints one `Filename: ..., Full Path: s3://...` line per match on stdout.
/// Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "s3-suffix-walk", version, about)]
pub struct Args {
    /// Bucket to walk
    #[arg(short, long, env = "S3_WALK_BUCKET")]
    pub bucket: String,

    /// Prefix to start from (empty for the bucket root)
    #[arg(short, long, env = "S3_WALK_PREFIX", default_value = "")]
    pub prefix: String,

    /// AWS region; without it the SDK's provider chain decides, then us-west-2
    #[arg(short, long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Accepted key suffixes, repeatable or comma separated
    #[arg(
        short,
        long = "suffix",
        env = "S3_WALK_SUFFIXES",
        value_delimiter = ',',
        default_values = [".parquet", ".csv", ".txt", ".tar"]
    )]
    pub suffixes: Vec<String>,

    /// Custom endpoint URL for S3-compatible services
    #[arg(long, env = "S3_WALK_ENDPOINT")]
    pub endpoint_url: Option<String>,

    /// Sign requests with the default credential chain instead of anonymous access
    #[arg(long)]
    pub signed: bool,

    /// Follow continuation tokens instead of reading only the first page of each prefix
    #[arg(long)]
    pub all_pages: bool,

    /// Maximum keys per listing page
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=1000))]
    pub max_keys: Option<i32>,

    /// Log level, overridden by RUST_LOG when set
    #[arg(long, env = "S3_WALK_LOG_LEVEL", value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default().with_unsigned(!self.signed);

        if let Some(region) = &self.region {
            config = config.with_region(region);
        }
        if let Some(endpoint) = &self.endpoint_url {
            config = config.with_endpoint(endpoint);
        }
        config
    }

    pub fn walk_options(&self) -> WalkOptions {
        let pagination = if self.all_pages {
            Pagination::AllPages
        } else {
            Pagination::FirstPage
        };

        WalkOptions::default()
            .with_pagination(pagination)
            .with_max_keys(self.max_keys)
    }

    pub fn suffix_set(&self) -> SuffixSet {
        self.suffixes.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Logs are written to stderr so stdout only carries matches.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("s3-suffix-walk").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn bucket_is_required() {
        assert!(Args::try_parse_from(["s3-suffix-walk"]).is_err());
    }

    #[test]
    fn defaults() {
        let args = parse(&["-b", "ai2-public-datasets"]);

        assert_eq!(args.bucket, "ai2-public-datasets");
        assert_eq!(args.prefix, "");
        assert_eq!(args.suffix_set(), SuffixSet::default());
        assert_eq!(args.log_level, LogLevel::Warn);

        let client = args.client_config();
        assert!(client.unsigned);
        assert!(client.endpoint.is_none());

        let options = args.walk_options();
        assert_eq!(options.pagination, Pagination::FirstPage);
        assert!(options.max_keys.is_none());
    }

    #[test]
    fn suffixes_accept_commas_and_repeats() {
        let args = parse(&["-b", "b", "-s", ".csv,.json", "--suffix", ".gz"]);
        assert_eq!(args.suffixes, vec![".csv", ".json", ".gz"]);
    }

    #[test]
    fn all_flags() {
        let args = parse(&[
            "--bucket",
            "b",
            "--prefix",
            "merra2/",
            "--region",
            "eu-west-1",
            "--endpoint-url",
            "http://localhost:9000",
            "--signed",
            "--all-pages",
            "--max-keys",
            "100",
            "--log-level",
            "debug",
        ]);

        assert_eq!(args.prefix, "merra2/");
        assert_eq!(args.log_level, LogLevel::Debug);

        let client = args.client_config();
        assert_eq!(client.region.as_deref(), Some("eu-west-1"));
        assert_eq!(client.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(!client.unsigned);

        let options = args.walk_options();
        assert_eq!(options.pagination, Pagination::AllPages);
        assert_eq!(options.max_keys, Some(100));
    }

    #[test]
    fn missing_region_is_left_to_the_provider_chain() {
        let mut args = parse(&["-b", "b"]);
        args.region = None;

        assert!(args.client_config().region.is_none());
    }

    #[test]
    fn max_keys_is_bounded() {
        assert!(Args::try_parse_from(["s3-suffix-walk", "-b", "b", "--max-keys", "0"]).is_err());
    }
}
