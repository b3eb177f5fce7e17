//! Validated parameters for one tally run.
//!
//! Everything a run needs comes from the command line. `TallyConfig` turns the raw argument
//! strings into typed values before any input is read, so the scan itself never has to deal with
//! bad parameters.

use crate::args::TallyArgs;
use crate::criteria::Criteria;
use crate::model::TxDate;
use crate::ranking::{Bounds, ReportMode};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The `Config` for a tally: which file to read, how to filter and select, and where, if
/// anywhere, to write the CSV report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyConfig {
    input: PathBuf,
    mode: ReportMode,
    bounds: Bounds,
    criteria: Criteria,
    csv: Option<PathBuf>,
}

impl TallyConfig {
    pub fn new(
        input: impl Into<PathBuf>,
        mode: ReportMode,
        bounds: Bounds,
        criteria: Criteria,
        csv: Option<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            mode,
            bounds,
            criteria,
            csv,
        }
    }

    /// Builds the configuration for `mode` from command line arguments.
    ///
    /// Date bounds go through the same normalizer as the transaction dates in the file. A bound
    /// that is empty or does not parse imposes no limit; a warning names the value that was
    /// ignored. An inverted `[min, max]` range is allowed and selects nobody.
    pub fn from_args(mode: ReportMode, args: &TallyArgs) -> Self {
        let bounds = Bounds::new(args.min(), args.max());
        if bounds.is_empty() {
            warn!(
                "The minimum {} is greater than the maximum {}, no contributors can be selected",
                bounds.min(),
                bounds.max()
            );
        }
        let criteria = Criteria::new(
            args.state().map(String::from),
            date_bound("start", args.start_date()),
            date_bound("end", args.end_date()),
        );
        Self::new(
            args.file(),
            mode,
            bounds,
            criteria,
            args.csv().map(Path::to_path_buf),
        )
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn csv(&self) -> Option<&Path> {
        self.csv.as_deref()
    }
}

fn date_bound(which: &str, value: Option<&str>) -> Option<NaiveDate> {
    let value = value?;
    match TxDate::parse(value) {
        TxDate::Date(date) => Some(date),
        TxDate::Empty => None,
        TxDate::Invalid => {
            warn!("Ignoring {which} date '{value}', expected a valid MMDDYYYY date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Wrapper {
        #[clap(flatten)]
        args: TallyArgs,
    }

    fn parse(argv: &[&str]) -> TallyArgs {
        let argv = std::iter::once("tally").chain(argv.iter().copied());
        Wrapper::parse_from(argv).args
    }

    #[test]
    fn test_from_args_minimal() {
        let args = parse(&["itcont.txt", "1", "5"]);
        let config = TallyConfig::from_args(ReportMode::Count, &args);
        assert_eq!(config.input(), Path::new("itcont.txt"));
        assert_eq!(config.bounds(), Bounds::new(1, 5));
        assert_eq!(config.criteria(), &Criteria::default());
        assert_eq!(config.csv(), None);
    }

    #[test]
    fn test_from_args_all_options() {
        let args = parse(&[
            "itcont.txt",
            "2",
            "3",
            "--state",
            "NY",
            "--start-date",
            "01012023",
            "--end-date",
            "01312023",
            "--csv",
            "out.csv",
        ]);
        let config = TallyConfig::from_args(ReportMode::Days, &args);
        assert_eq!(config.mode(), ReportMode::Days);
        assert_eq!(config.criteria().state(), Some("NY"));
        assert_eq!(
            config.criteria().start_date(),
            NaiveDate::from_ymd_opt(2023, 1, 1)
        );
        assert_eq!(
            config.criteria().end_date(),
            NaiveDate::from_ymd_opt(2023, 1, 31)
        );
        assert_eq!(config.csv(), Some(Path::new("out.csv")));
    }

    #[test]
    fn test_unparseable_date_bound_is_no_bound() {
        let args = parse(&["f", "1", "2", "--start-date", "2023-01-01", "--end-date", ""]);
        let config = TallyConfig::from_args(ReportMode::Count, &args);
        assert_eq!(config.criteria().start_date(), None);
        assert_eq!(config.criteria().end_date(), None);
    }

    #[test]
    fn test_inverted_bounds_are_allowed() {
        let args = parse(&["f", "5", "1"]);
        let config = TallyConfig::from_args(ReportMode::Count, &args);
        assert!(config.bounds().is_empty());
    }
}
