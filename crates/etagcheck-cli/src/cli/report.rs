//! Console output: report lines, human-readable sizes, and the progress line.

use etagcheck_core::location::ObjectLocation;
use etagcheck_core::progress::DigestProgress;
use etagcheck_core::remote::RemoteObjectMetadata;
use etagcheck_core::verify::VerifyObserver;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::time::{Duration, Instant};

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// `1536` -> `1.5 KiB`. Values past TiB are shown in PiB.
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} PiB", size)
}

/// Draws a single `\r`-refreshed progress line, at most once per `interval`.
pub struct ProgressLine<W: Write = io::Stdout> {
    out: W,
    label: &'static str,
    enabled: bool,
    interval: Duration,
    started: Option<Instant>,
    last_draw: Option<Instant>,
    /// A line was drawn and not yet terminated.
    open: bool,
}

impl ProgressLine {
    /// On stdout; disabled automatically when stdout is not a terminal.
    pub fn new(label: &'static str, enabled: bool, interval: Duration) -> Self {
        let enabled = enabled && io::stdout().is_terminal();
        Self::with_writer(io::stdout(), label, enabled, interval)
    }
}

impl<W: Write> ProgressLine<W> {
    pub fn with_writer(out: W, label: &'static str, enabled: bool, interval: Duration) -> Self {
        Self {
            out,
            label,
            enabled,
            interval,
            started: None,
            last_draw: None,
            open: false,
        }
    }

    pub fn update(&mut self, p: DigestProgress) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        let started = *self.started.get_or_insert(now);
        let due = self
            .last_draw
            .map_or(true, |t| now.duration_since(t) >= self.interval);
        if !due && !p.is_complete() {
            return;
        }
        self.last_draw = Some(now);

        let elapsed = now.duration_since(started).as_secs_f64();
        let rate = if elapsed > 0.0 {
            format!("{}/s", human_size((p.bytes_done as f64 / elapsed) as u64))
        } else {
            "-".to_string()
        };
        let _ = write!(
            self.out,
            "\r{}  {} / {} ({:.1}%)  part {}  {}    ",
            self.label,
            human_size(p.bytes_done),
            human_size(p.total_bytes),
            p.fraction() * 100.0,
            p.parts_done,
            rate
        );
        self.open = true;
        if p.is_complete() {
            self.finish();
        }
        let _ = self.out.flush();
    }

    /// Terminate a partly drawn line so later output starts on its own line.
    pub fn finish(&mut self) {
        if self.open {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.open = false;
        }
    }
}

/// Prints the verification report as the run proceeds.
pub struct ReportPrinter {
    progress: ProgressLine,
}

impl ReportPrinter {
    pub fn new(show_progress: bool, interval: Duration) -> Self {
        Self {
            progress: ProgressLine::new("Calculating ETag", show_progress, interval),
        }
    }
}

impl VerifyObserver for ReportPrinter {
    fn local_file(&mut self, path: &Path, size: u64) {
        println!("Local File:      {}", path.display());
        println!("Local File Size: {} bytes", size);
        println!();
    }

    fn remote_object(&mut self, location: &ObjectLocation, m: &RemoteObjectMetadata) {
        println!("S3 Object:       {}", location);
        println!("ETag:            {}", m.etag);
        println!("Object Size:     {} bytes", m.object_size);
        println!("Display Size:    {}", human_size(m.object_size));
        println!("Total Parts:     {}", m.parts_count);
        println!("Part Size:       {} bytes", m.part_size);
        println!();
    }

    fn progress(&mut self, p: DigestProgress) {
        self.progress.update(p);
    }
}

impl ReportPrinter {
    /// Close the progress line; call before printing the verdict.
    pub fn finish(&mut self) {
        self.progress.finish();
    }
}
