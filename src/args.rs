//! These structs provide the CLI interface for the tally CLI.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// tally: A command-line tool for tallying individual campaign contributions.
///
/// The purpose of this program is to read an FEC individual contributions bulk file (see
/// https://www.fec.gov/campaign-finance-data/contributions-individuals-file-description/) and
/// report on repeat contributors: how often they gave, how much, on how many distinct days, and
/// for which employers.
///
/// Contributors are identified by name and ZIP code. Only records with entity type IND are
/// counted. Malformed lines are skipped silently.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Report contributors whose number of donations falls within [MIN, MAX].
    ///
    /// Contributors are ranked by their number of donations, highest first.
    Count(TallyArgs),
    /// Report contributors whose number of distinct donation days falls within [MIN, MAX].
    ///
    /// Several donations on the same calendar day count as one day. Contributors are ranked by
    /// their number of distinct donation days, highest first.
    Days(TallyArgs),
    /// Copy the lines of an FEC file whose committee ID (the first field) matches exactly.
    Filter(FilterArgs),
    /// Append every .txt file in a directory, in file name order, to a single output file.
    Merge(MergeArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, env = "FEC_TALLY_LOG_LEVEL", default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

/// (Not shown): Args for the `tally count` and `tally days` commands.
#[derive(Debug, Parser, Clone)]
pub struct TallyArgs {
    /// Path to the pipe-delimited FEC individual contributions file.
    file: PathBuf,

    /// The smallest number of donations (or distinct days) to report, inclusive.
    min: u64,

    /// The largest number of donations (or distinct days) to report, inclusive.
    max: u64,

    /// Only count contributions from this two-letter state code. Matched exactly as given.
    #[arg(long)]
    state: Option<String>,

    /// Only count contributions made on or after this date (MMDDYYYY).
    #[arg(long)]
    start_date: Option<String>,

    /// Only count contributions made on or before this date (MMDDYYYY).
    #[arg(long)]
    end_date: Option<String>,

    /// Also write the report to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl TallyArgs {
    pub fn new(file: impl Into<PathBuf>, min: u64, max: u64) -> Self {
        Self {
            file: file.into(),
            min,
            max,
            state: None,
            start_date: None,
            end_date: None,
            csv: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_dates(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_csv(mut self, csv: impl Into<PathBuf>) -> Self {
        self.csv = Some(csv.into());
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref()
    }

    pub fn csv(&self) -> Option<&Path> {
        self.csv.as_deref()
    }
}

/// (Not shown): Args for the `tally filter` command.
#[derive(Debug, Parser, Clone)]
pub struct FilterArgs {
    /// The committee ID to keep, e.g. C00401224.
    cmte_id: String,

    /// The FEC file to read.
    input: PathBuf,

    /// Where to write the matching lines. Overwritten if it exists.
    output: PathBuf,
}

impl FilterArgs {
    pub fn new(
        cmte_id: impl Into<String>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cmte_id: cmte_id.into(),
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn cmte_id(&self) -> &str {
        &self.cmte_id
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// (Not shown): Args for the `tally merge` command.
#[derive(Debug, Parser, Clone)]
pub struct MergeArgs {
    /// The directory holding the .txt files to merge.
    input_dir: PathBuf,

    /// The file to append to. Created if it does not exist.
    output: PathBuf,
}

impl MergeArgs {
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: output.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}
