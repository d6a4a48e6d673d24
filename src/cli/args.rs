use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Look up geographic and network metadata for IP addresses.",
    long_about = None
)]
pub struct Args {
    /// Base URL of the geolocation API [env: GEOLOCATE_URL]
    #[arg(long)]
    pub url: Option<String>,

    /// Redis URL used to cache resolved addresses [env: GEOLOCATE_REDIS_URL]
    #[arg(long, conflicts_with = "memory_cache")]
    pub redis_url: Option<String>,

    /// Cache resolved addresses in memory for this run instead of Redis
    #[arg(long)]
    pub memory_cache: bool,

    /// Cache entry lifetime in seconds [env: GEOLOCATE_CACHE_TTL]
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Address prefix of the local network [env: GEOLOCATE_LOCAL_PREFIX]
    #[arg(long)]
    pub local_prefix: Option<String>,

    /// Geolocation API request timeout in milliseconds [env: GEOLOCATE_HTTP_TIMEOUT]
    #[arg(long)]
    pub http_timeout: Option<u64>,

    /// Redis operation timeout in milliseconds [env: GEOLOCATE_CACHE_TIMEOUT]
    #[arg(long)]
    pub cache_timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Line)]
    pub output: OutputFormat,

    /// Save the results to a CSV file
    #[arg(long = "csv")]
    pub csv_file: Option<PathBuf>,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// IP addresses to look up; read from stdin (one per line) when omitted
    pub addresses: Vec<String>,
}

/*--------------------------------------------------------------------------------------
  Output Format
--------------------------------------------------------------------------------------*/

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One colored summary line per address
    Line,

    /// A table of all results
    Table,

    /// One JSON object per line
    Json,
}
