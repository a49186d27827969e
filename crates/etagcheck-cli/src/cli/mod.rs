//! CLI for etagcheck.

mod commands;
mod interrupt;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use etagcheck_core::{config, logging};
use std::path::PathBuf;

use commands::{run_etag, run_verify, VerifyArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "etagcheck")]
#[command(
    about = "Verify a local file against an S3 object without downloading it",
    long_about = None
)]
pub struct Cli {
    /// More log output on stderr (-v, -vv, -vvv). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to ~/.local/state/etagcheck/etagcheck.log instead of stderr.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check that a local file matches an S3 object (size first, then multipart ETag).
    Verify {
        /// Bucket name.
        #[arg(long)]
        bucket: String,

        /// Object key.
        #[arg(long)]
        key: String,

        /// Path to the local file.
        #[arg(long, value_name = "PATH")]
        local_file: PathBuf,

        /// Signing region (default: AWS environment/profile, config file, then us-east-1).
        #[arg(long)]
        region: Option<String>,

        /// Endpoint URL for S3-compatible stores (default: AWS_ENDPOINT_URL/profile, config file, then AWS).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Do not draw the progress line while hashing.
        #[arg(long)]
        no_progress: bool,
    },

    /// Compute the multipart ETag of a local file for a given part size.
    Etag {
        /// Path to the file.
        path: PathBuf,

        /// Part size used at upload, in bytes or with a KiB/MiB/GiB suffix (e.g. 8MiB).
        #[arg(long, value_name = "SIZE", value_parser = parse_part_size)]
        part_size: u64,

        /// Do not draw the progress line while hashing.
        #[arg(long)]
        no_progress: bool,
    },
}

impl Cli {
    /// Returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        init_logging(cli.verbose, cli.log_file);

        let cfg = config::load()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Verify {
                bucket,
                key,
                local_file,
                region,
                endpoint,
                no_progress,
            } => {
                let args = VerifyArgs {
                    bucket,
                    key,
                    local_file,
                    region,
                    endpoint,
                    show_progress: !no_progress,
                };
                run_verify(args, &cfg).await
            }
            CliCommand::Etag {
                path,
                part_size,
                no_progress,
            } => run_etag(path, part_size, !no_progress, &cfg).await,
        }
    }
}

fn init_logging(verbosity: u8, to_file: bool) {
    if !to_file {
        logging::init_logging_stderr(verbosity);
        return;
    }
    if let Err(e) = logging::init_logging(verbosity) {
        eprintln!("etagcheck: log file unavailable ({}), logging to stderr", e);
        logging::init_logging_stderr(verbosity);
    }
}

/// Parse `8388608`, `16KiB`, `8MiB` or `1GiB` into a byte count > 0.
fn parse_part_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num, unit) = s.split_at(digits_end);
    let n: u64 = num
        .parse()
        .map_err(|_| format!("expected a number of bytes, got {:?}", s))?;
    let mult: u64 = match unit.trim() {
        "" | "B" => 1,
        "KiB" => 1 << 10,
        "MiB" => 1 << 20,
        "GiB" => 1 << 30,
        other => return Err(format!("unknown unit {:?} (use B, KiB, MiB or GiB)", other)),
    };
    let bytes = n
        .checked_mul(mult)
        .ok_or_else(|| format!("part size {:?} is too large", s))?;
    if bytes == 0 {
        return Err("part size must be greater than zero".to_string());
    }
    Ok(bytes)
}
