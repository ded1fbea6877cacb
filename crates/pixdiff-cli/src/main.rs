//! pixdiff: pixel-exact visual regression for screenshot sets
//!
//! ## Usage
//!
//! ```bash
//! pixdiff                                  # ./source/*.* against ./target/*.*
//! pixdiff 'base/*.gif' 'new/*.gif'         # explicit patterns
//! pixdiff -x _nc.gif                       # skip files containing "_nc.gif"
//! pixdiff -l --strict --format json        # fresh logs, fail on mismatch, JSON summary
//! ```

use clap::Parser;
use pixdiff_cli::{Cli, Runner};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let runner = Runner::from_cli(&cli);

    match runner.execute() {
        Ok(status) if runner.fails(status) => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
