//! Drives one comparison run from parsed arguments

use crate::commands::Cli;
use crate::config::{CliConfig, ColorChoice, Verbosity};
use crate::error::CliResult;
use crate::housekeeping::{clear_dir_files, ensure_dir};
use pixdiff::{
    delete_old_logs, ArtifactFormat, Comparator, ComparatorConfig, RunLog, RunReporter,
    RunSummary,
};
use tracing_subscriber::EnvFilter;

/// How a completed run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No compared pair differed
    Clean,
    /// At least one pair differed
    Mismatched,
}

/// Build the shell configuration from CLI args
#[must_use]
pub fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_output_dir(&cli.output)
        .with_log_dir(&cli.log_dir)
        .with_delete_logs(cli.log_delete)
        .with_clear_output(!cli.keep_diffs)
        .with_strict(cli.strict)
        .with_summary_format(cli.format)
}

/// Build the comparison configuration from CLI args
#[must_use]
pub fn build_comparator_config(cli: &Cli) -> ComparatorConfig {
    let format = if cli.gif {
        ArtifactFormat::Gif
    } else {
        ArtifactFormat::SameAsInput
    };
    ComparatorConfig::new(&cli.source, &cli.target)
        .with_exclusion(&cli.exclude)
        .with_output_dir(&cli.output)
        .with_artifact_format(format)
}

/// Runs housekeeping, the comparison and the summary output
#[derive(Debug)]
pub struct Runner {
    config: CliConfig,
    comparator: ComparatorConfig,
}

impl Runner {
    /// Create a runner
    #[must_use]
    pub const fn new(config: CliConfig, comparator: ComparatorConfig) -> Self {
        Self { config, comparator }
    }

    /// Create a runner from parsed arguments
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new(build_config(cli), build_comparator_config(cli))
    }

    /// Execute the run.
    ///
    /// Resolution failures are logged once and returned; everything else
    /// completes with a [`RunStatus`].
    pub fn execute(&self) -> CliResult<RunStatus> {
        self.prepare_directories()?;

        let mut log = RunLog::builder(&self.config.log_dir);
        if self.config.verbosity.is_debug() {
            log = log.with_stderr(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("pixdiff=debug,pixdiff_cli=debug")),
            );
        }
        let log = log.install()?;
        tracing::debug!(log = %log.path().display(), config = ?self.config, "run started");

        let reporter = RunReporter::new(
            self.config.color.should_color(),
            self.config.verbosity.is_quiet() || self.config.json_summary,
        )
        .with_verbose(self.config.verbosity.is_verbose());
        let summary = match Comparator::new(self.comparator.clone()).run(reporter) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("{e}");
                return Err(e.into());
            }
        };

        if self.config.json_summary {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        drop(log);

        Ok(status_of(&summary))
    }

    /// Whether `status` should turn into a failing exit code
    #[must_use]
    pub const fn fails(&self, status: RunStatus) -> bool {
        self.config.strict && matches!(status, RunStatus::Mismatched)
    }

    fn prepare_directories(&self) -> CliResult<()> {
        let quiet = self.config.verbosity.is_quiet() || self.config.json_summary;
        let say = |message: String| {
            if !quiet {
                eprintln!("{message}");
            }
        };

        if self.config.delete_logs {
            let deleted = delete_old_logs(&self.config.log_dir)?;
            if deleted > 0 {
                say(format!("Deleted {deleted} log file(s)."));
            }
        }

        let output = &self.config.output_dir;
        if ensure_dir(output)? {
            say(format!("Created {} folder.", output.display()));
        } else if self.config.clear_output {
            let deleted = clear_dir_files(output)?;
            if deleted > 0 {
                say(format!(
                    "Cleared {} folder. Deleted {deleted} file(s).",
                    output.display()
                ));
            }
        }

        if ensure_dir(&self.config.log_dir)? {
            say(format!("Created {} folder.", self.config.log_dir.display()));
        }
        Ok(())
    }
}

fn status_of(summary: &RunSummary) -> RunStatus {
    if summary.all_matched() {
        RunStatus::Clean
    } else {
        RunStatus::Mismatched
    }
}
