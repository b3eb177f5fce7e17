//! The `count` and `days` report commands.

use crate::aggregator::Aggregator;
use crate::commands::Out;
use crate::config::TallyConfig;
use crate::criteria::Criteria;
use crate::model::Amount;
use crate::ranking::{self, Bounds, ReportMode};
use crate::report::Report;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Structured description of a finished tally.
#[derive(Debug, Clone, Serialize)]
pub struct TallySummary {
    mode: ReportMode,
    bounds: Bounds,
    criteria: Criteria,
    lines_read: u64,
    records_tallied: u64,
    contributors_seen: u64,
    contributors_selected: u64,
    total_amount: Amount,
    csv: Option<PathBuf>,
}

impl TallySummary {
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn records_tallied(&self) -> u64 {
        self.records_tallied
    }

    pub fn contributors_seen(&self) -> u64 {
        self.contributors_seen
    }

    pub fn contributors_selected(&self) -> u64 {
        self.contributors_selected
    }

    pub fn total_amount(&self) -> Amount {
        self.total_amount
    }
}

/// Reads the input file once, tallies every qualifying record, then writes the ranked report to
/// `console` and, if requested, to a CSV file.
///
/// # Arguments
/// - `config` - The validated run parameters.
/// - `console` - Where the report lines go, normally stdout.
///
/// # Errors
/// - Returns an error if the input file cannot be read.
/// - Returns an error if the report cannot be written to `console` or to the CSV file. The CSV
///   file is not touched until the whole input has been tallied.
pub fn tally(config: TallyConfig, console: &mut impl Write) -> Result<Out<TallySummary>> {
    let mut aggregator = Aggregator::new(config.criteria().clone());
    aggregator.read_file(config.input())?;
    let (contributors, stats) = aggregator.finish();
    let contributors_seen = contributors.len() as u64;

    let rows = ranking::select(contributors, config.mode(), config.bounds());
    let report = Report::new(config.mode(), config.bounds(), rows);
    debug!(
        "Selected {} of {contributors_seen} contributors",
        report.rows().len()
    );

    for line in report.console_lines() {
        writeln!(console, "{line}").context("Unable to write the report to the console")?;
    }

    if let Some(csv) = config.csv() {
        report.write_csv(csv)?;
        writeln!(console, "Results have been exported to {}", csv.display())
            .context("Unable to write to the console")?;
    }

    let totals = report.totals();
    let summary = TallySummary {
        mode: config.mode(),
        bounds: config.bounds(),
        criteria: config.criteria().clone(),
        lines_read: stats.lines(),
        records_tallied: stats.aggregated(),
        contributors_seen,
        contributors_selected: totals.total_contributors(),
        total_amount: totals.total_amount(),
        csv: config.csv().map(|p| p.to_path_buf()),
    };
    let message = format!(
        "Tallied {} records from {}: {} of {contributors_seen} contributors selected",
        stats.aggregated(),
        config.input().display(),
        totals.total_contributors(),
    );
    Ok(Out::new(message, summary))
}
