//! Per-mesh diagnostics log.
//!
//! Every export pass writes its own log next to the exported file. Messages
//! are counted per severity whether or not they pass the threshold, and the
//! error count decides whether the pass may publish its output.

use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Severity of a diagnostic message, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Error,
}

impl Severity {
    /// Threshold for the log file: everything when verbose, info and up
    /// otherwise.
    pub fn threshold(verbose: bool) -> Self {
        if verbose {
            Severity::Debug
        } else {
            Severity::Info
        }
    }

    fn slot(self) -> usize {
        match self {
            Severity::Debug => 0,
            Severity::Info => 1,
            Severity::Error => 2,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Debug => write!(f, "debug"),
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A counting logger writing `smf: <severity>: <message>` lines to a sink
/// and mirroring them to `tracing`.
pub struct Diagnostics<W: Write = BufWriter<File>> {
    sink: W,
    threshold: Severity,
    counts: [usize; 3],
}

impl Diagnostics<BufWriter<File>> {
    /// Create (or truncate) a log file at `path`.
    pub fn create(path: &Path, threshold: Severity) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), threshold))
    }
}

impl<W: Write> Diagnostics<W> {
    pub fn new(sink: W, threshold: Severity) -> Self {
        let mut diagnostics = Self {
            sink,
            threshold,
            counts: [0; 3],
        };
        diagnostics.debug("debug logging enabled");
        diagnostics
    }

    pub fn log(&mut self, severity: Severity, message: impl AsRef<str>) {
        let message = message.as_ref();
        self.counts[severity.slot()] += 1;

        if severity < self.threshold {
            return;
        }

        match severity {
            Severity::Debug => tracing::debug!("{}", message),
            Severity::Info => tracing::info!("{}", message),
            Severity::Error => tracing::error!("{}", message),
        }

        if let Err(e) = writeln!(self.sink, "smf: {}: {}", severity, message) {
            tracing::warn!("failed to write diagnostics log: {}", e);
        }
    }

    pub fn debug(&mut self, message: impl AsRef<str>) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.log(Severity::Info, message);
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.log(Severity::Error, message);
    }

    /// Number of messages logged at `severity`, including filtered ones.
    pub fn count(&self, severity: Severity) -> usize {
        self.counts[severity.slot()]
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Consume the logger and return its sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_include_filtered_messages() {
        let mut log = Diagnostics::new(Vec::new(), Severity::Info);
        log.debug("hidden");
        log.info("shown");
        log.error("broken");

        // The constructor's own debug message counts too.
        assert_eq!(log.count(Severity::Debug), 2);
        assert_eq!(log.count(Severity::Info), 1);
        assert_eq!(log.error_count(), 1);

        let text = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(text, "smf: info: shown\nsmf: error: broken\n");
    }

    #[test]
    fn test_verbose_writes_debug() {
        let mut log = Diagnostics::new(Vec::new(), Severity::threshold(true));
        log.debug("detail");

        let text = String::from_utf8(log.into_inner()).unwrap();
        assert!(text.starts_with("smf: debug: debug logging enabled\n"));
        assert!(text.contains("smf: debug: detail\n"));
    }

    #[test]
    fn test_log_file_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.log");

        let mut log = Diagnostics::create(&path, Severity::Info).unwrap();
        log.info("hello");
        log.flush().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "smf: info: hello\n");
    }
}
