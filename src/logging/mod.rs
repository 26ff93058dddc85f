//! Application logging functionality
//!
//! Two sinks share one `tracing` subscriber:
//! - stderr, filtered by level (stdout carries the SVG document)
//! - the diagnostic log, an append-only file that receives only events
//!   with the [`DIAGNOSTIC_TARGET`] target, written as bare messages
//!
//! The returned [`LoggingGuard`] owns the file writer; dropping it flushes
//! the diagnostic log.

use std::path::{Path, PathBuf};
use tracing::{debug, info, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Target for events that belong in the diagnostic log
pub const DIAGNOSTIC_TARGET: &str = "layers2font::diagnostic";

/// File name of the diagnostic log inside the temp directory
pub const DEFAULT_LOG_FILE_NAME: &str = "inkscape-ext-logfile";

/// Default stderr filter: warnings and errors only
pub const DEFAULT_FILTER: &str = "layers2font=warn";

/// Where logs go for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Diagnostic log path, or `None` to disable it
    pub diagnostic_file: Option<PathBuf>,
    /// `EnvFilter` directives for stderr
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            diagnostic_file: Some(default_log_file()),
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl LogSettings {
    pub fn without_diagnostic_file(&self) -> Self {
        Self {
            diagnostic_file: None,
            filter: self.filter.clone(),
        }
    }
}

/// Get the path to the default diagnostic log
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME)
}

/// Keeps the diagnostic log writer alive for the duration of a run
pub struct LoggingGuard {
    _diagnostic: Option<WorkerGuard>,
}

/// Install the global subscriber, unless one is already installed
pub fn init(settings: &LogSettings) -> anyhow::Result<LoggingGuard> {
    let directives = format!("{},{}=off", settings.filter, DIAGNOSTIC_TARGET);
    let stderr_filter = EnvFilter::try_new(&directives)?;
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let (diagnostic, guard) = match &settings.diagnostic_file {
        Some(path) => {
            let (writer, guard) = open_diagnostic_log(path)?;
            (Some(diagnostic_layer(writer)), Some(guard))
        }
        None => (None, None),
    };

    // A host that already installed a subscriber keeps it
    if let Err(e) = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(diagnostic)
        .try_init()
    {
        debug!("Using the existing global subscriber: {e}");
    }

    if let Some(path) = &settings.diagnostic_file {
        debug!("Diagnostic log: {}", path.display());
    }
    Ok(LoggingGuard {
        _diagnostic: guard,
    })
}

/// Open the diagnostic log for appending, creating it and its directory if needed
pub fn open_diagnostic_log(path: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Layer writing diagnostic events as bare message lines
pub fn diagnostic_layer<S>(writer: NonBlocking) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter_fn(|metadata| metadata.target() == DIAGNOSTIC_TARGET))
}

/// Mark the start of a run in the diagnostic log
pub fn log_run_start() {
    info!(target: DIAGNOSTIC_TARGET, "\n\n{}\n\n", "*".repeat(80));
    debug!(
        "Run started at {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_source::FontMetrics;
    use tracing::warn;

    #[test]
    fn diagnostic_log_gets_separator_and_metric_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ext.log");
        std::fs::write(&path, "previous run\n").unwrap();

        let (writer, guard) = open_diagnostic_log(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(diagnostic_layer(writer));
        tracing::subscriber::with_default(subscriber, || {
            log_run_start();
            warn!("not a diagnostic event");
            FontMetrics {
                set_width: 1000,
                baseline: 200,
                ascender: 750,
                descender: -200,
                cap_height: 700,
                x_height: 500,
                left_bearing: 30,
                right_bearing: 970,
            }
            .log();
        });
        drop(guard);

        let contents = std::fs::read_to_string(&path).unwrap();
        let expected = format!(
            "previous run\n\n\n{}\n\n\n\
             setwidth: 1000\nbaseline: 200\nascender: 750\ndescender: -200\n\
             caps: 700\nxheight: 500\nlbearing: 30\nrbearing: 970\n",
            "*".repeat(80)
        );
        assert_eq!(contents, expected);
    }

    #[test]
    fn default_log_lives_in_temp_dir() {
        let settings = LogSettings::default();
        assert_eq!(
            settings.diagnostic_file,
            Some(std::env::temp_dir().join("inkscape-ext-logfile"))
        );
        assert_eq!(settings.without_diagnostic_file().diagnostic_file, None);
    }
}
