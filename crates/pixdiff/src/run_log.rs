//! Per-run log file.
//!
//! A [`RunLog`] owns a timestamp-named file and installs a `tracing`
//! subscriber that writes to it for as long as the `RunLog` is alive on the
//! current thread. Nothing is installed globally; dropping the `RunLog`
//! restores the previous subscriber and closes the file.

use crate::result::{PixdiffError, PixdiffResult};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// File name prefix of every run log
pub const LOG_PREFIX: &str = "log_image_diff_";

/// File name extension of every run log
pub const LOG_EXTENSION: &str = "log";

/// `<timestamp> - <LEVEL> - <message>` lines
#[derive(Debug, Clone, Copy, Default)]
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log file name for a run started at `started`
#[must_use]
pub fn log_file_name(started: NaiveDateTime) -> String {
    format!(
        "{LOG_PREFIX}{}.{LOG_EXTENSION}",
        started.format("%Y%m%d%H%M%S")
    )
}

fn is_run_log(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(LOG_PREFIX)
        && path.extension().and_then(|e| e.to_str()) == Some(LOG_EXTENSION)
}

/// Remove previous run logs from `dir`, returning how many were deleted.
///
/// A missing directory counts as zero logs.
pub fn delete_old_logs(dir: &Path) -> PixdiffResult<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let mut deleted = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_run_log(&path) {
            fs::remove_file(&path)?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Builder for a [`RunLog`]
#[derive(Debug)]
pub struct RunLogBuilder {
    dir: PathBuf,
    started: Option<NaiveDateTime>,
    stderr_filter: Option<EnvFilter>,
}

impl RunLogBuilder {
    /// Use a fixed start time instead of the current local time
    #[must_use]
    pub const fn with_start_time(mut self, started: NaiveDateTime) -> Self {
        self.started = Some(started);
        self
    }

    /// Also mirror events passing `filter` to stderr
    #[must_use]
    pub fn with_stderr(mut self, filter: EnvFilter) -> Self {
        self.stderr_filter = Some(filter);
        self
    }

    /// Open the log file and install the scoped subscriber.
    ///
    /// The directory must already exist. An existing file of the same name is
    /// appended to.
    pub fn install(self) -> PixdiffResult<RunLog> {
        let started = self.started.unwrap_or_else(|| Local::now().naive_local());
        let path = self.dir.join(log_file_name(started));
        let file = open_append(&path)?;

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .event_format(LineFormat)
            .with_filter(LevelFilter::INFO);
        let stderr_layer = self.stderr_filter.map(|filter| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter)
        });

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer);
        let guard = tracing::subscriber::set_default(subscriber);

        Ok(RunLog {
            path,
            _guard: guard,
        })
    }
}

fn open_append(path: &Path) -> PixdiffResult<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PixdiffError::LogSink {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// The log sink of a single run
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    _guard: DefaultGuard,
}

impl RunLog {
    /// Start building a log that will live in `dir`
    #[must_use]
    pub fn builder(dir: impl Into<PathBuf>) -> RunLogBuilder {
        RunLogBuilder {
            dir: dir.into(),
            started: None,
            stderr_filter: None,
        }
    }

    /// Create a log in `dir` named after the current time
    pub fn create(dir: impl Into<PathBuf>) -> PixdiffResult<Self> {
        Self::builder(dir).install()
    }

    /// Path of the log file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
