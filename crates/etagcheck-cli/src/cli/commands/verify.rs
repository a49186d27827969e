//! `etagcheck verify` – compare a local file with an S3 object.

use anyhow::{Context, Result};
use etagcheck_core::config::{EtagcheckConfig, Overrides};
use etagcheck_core::control::AbortToken;
use etagcheck_core::location::ObjectLocation;
use etagcheck_core::remote::{AwsEnvironment, CurlMetadataSource, MetadataSource};
use etagcheck_core::verify::{Verifier, VerifyError, VerifyReport, EXIT_INTERRUPTED};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::interrupt::{run_interruptible, Outcome};
use crate::cli::report::ReportPrinter;

#[derive(Debug)]
pub struct VerifyArgs {
    pub bucket: String,
    pub key: String,
    pub local_file: PathBuf,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub show_progress: bool,
}

/// Returns 0 when the file matches, non-zero otherwise.
pub async fn run_verify(args: VerifyArgs, cfg: &EtagcheckConfig) -> Result<i32> {
    let aws = AwsEnvironment::load(args.region.as_deref())
        .await
        .context("resolve AWS credentials")?;
    let overrides = Overrides {
        region: args.region,
        endpoint: args.endpoint,
    }
    .or(Overrides::from(&aws));
    let source = CurlMetadataSource::new(cfg.remote_settings(&overrides), aws.credentials);

    let job = Job {
        location: ObjectLocation::new(args.bucket, args.key),
        local_file: args.local_file,
        show_progress: args.show_progress,
        interval: cfg.progress_interval(),
    };
    check(source, job, AbortToken::new(), io::stdout()).await
}

/// One verification, independent of how the source was built.
struct Job {
    location: ObjectLocation,
    local_file: PathBuf,
    show_progress: bool,
    interval: Duration,
}

/// Run `job` on the blocking pool, then write the verdict to `out`.
async fn check<S, W>(source: S, job: Job, token: AbortToken, mut out: W) -> Result<i32>
where
    S: MetadataSource + Send + 'static,
    W: Write,
{
    let worker_token = token.clone();
    let outcome = run_interruptible(token, move || {
        let mut printer = ReportPrinter::new(job.show_progress, job.interval);
        let result = Verifier::new(&source)
            .with_abort(worker_token)
            .run(&job.local_file, &job.location, &mut printer);
        printer.finish();
        result
    })
    .await?;

    let result = match outcome {
        Outcome::Finished(result) => result,
        Outcome::Interrupted => Err(VerifyError::Interrupted),
    };
    conclude(result, &mut out).context("write verdict")
}

/// Print the verdict line (or the failure and its hint) and pick the exit code.
fn conclude(result: Result<VerifyReport, VerifyError>, out: &mut impl Write) -> io::Result<i32> {
    match result {
        Ok(report) => {
            tracing::debug!(etag = %report.local_etag, "match");
            writeln!(out, "Integrity check passed. Local file matches S3 object.")?;
            Ok(0)
        }
        Err(VerifyError::Interrupted) => {
            eprintln!("\nExiting...");
            Ok(EXIT_INTERRUPTED)
        }
        Err(e) => {
            writeln!(out, "{}", e)?;
            if let Some(hint) = e.hint() {
                writeln!(out, "  ({})", hint)?;
            }
            Ok(e.exit_code())
        }
    }
}

#[cfg(test)]
#[allow(dead_code)]
#[path = "../../../../etagcheck-core/tests/common/s3_server.rs"]
mod s3_server;
