//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{DEFAULT_CONFIG_PATH, Overrides};

/// tsvwatch - TSV drop-folder ingestion with a query API
#[derive(Parser, Debug)]
#[command(name = "tsvwatch")]
#[command(version)]
#[command(
    about = "Watches a directory for TSV files, validates them, renders reports and serves the results"
)]
pub struct Cli {
    /// Base configuration file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Watched directory
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Report output directory
    #[arg(long, value_name = "DIR")]
    pub odir: Option<PathBuf>,

    /// HTTP bind host
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP bind port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database host
    #[arg(long)]
    pub dbhost: Option<String>,

    /// Database port
    #[arg(long)]
    pub dbport: Option<u16>,

    /// Seconds between directory scans
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}

impl Cli {
    /// Flags that replace configuration file values.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            source_dir: self.dir.clone(),
            output_dir: self.odir.clone(),
            host: self.host.clone(),
            port: self.port,
            db_host: self.dbhost.clone(),
            db_port: self.dbport,
            scan_interval_secs: self.interval,
        }
    }
}
