//! `etagcheck etag <path> --part-size N` – print the multipart ETag of a local file.

use anyhow::{Context, Result};
use etagcheck_core::config::EtagcheckConfig;
use etagcheck_core::control::AbortToken;
use etagcheck_core::etag::{self, DigestOptions, EtagError};
use etagcheck_core::progress::DigestProgress;
use etagcheck_core::verify::EXIT_INTERRUPTED;
use std::path::PathBuf;

use crate::cli::interrupt::{run_interruptible, Outcome};
use crate::cli::report::ProgressLine;

pub async fn run_etag(
    path: PathBuf,
    part_size: u64,
    show_progress: bool,
    cfg: &EtagcheckConfig,
) -> Result<i32> {
    let size = std::fs::metadata(&path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    let interval = cfg.progress_interval();
    let token = AbortToken::new();

    let worker_path = path.clone();
    let worker_token = token.clone();
    let outcome = run_interruptible(token, move || {
        let mut line = ProgressLine::new("Calculating ETag", show_progress, interval);
        let mut on_progress = |p: DigestProgress| line.update(p);
        let opts = DigestOptions {
            total_size: size,
            abort: Some(&worker_token),
            on_progress: Some(&mut on_progress),
        };
        let result = etag::etag_path(&worker_path, part_size, opts);
        line.finish();
        result
    })
    .await?;

    match outcome {
        Outcome::Finished(Ok(etag)) => {
            println!("{}  {}", etag, path.display());
            Ok(0)
        }
        Outcome::Finished(Err(EtagError::Interrupted)) | Outcome::Interrupted => {
            eprintln!("\nExiting...");
            Ok(EXIT_INTERRUPTED)
        }
        Outcome::Finished(Err(e)) => {
            Err(e).with_context(|| format!("compute ETag of {}", path.display()))
        }
    }
}
