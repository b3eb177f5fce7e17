//! Rendering of the ranked tally to console lines and to a CSV file.

use crate::model::{Amount, ContributorAggregate, ContributorKey};
use crate::ranking::{Bounds, ReportMode};
use crate::{fs, Result};
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Rendered in place of the employer list when a contributor has none.
pub const UNKNOWN_EMPLOYER: &str = "Unknown";

const NAME_STR: &str = "Name";
const ZIP_CODE_STR: &str = "ZIP Code";
const NUMBER_OF_DONATIONS_STR: &str = "Number of Donations";
const CONTRIBUTIONS_STR: &str = "Contributions";
const TOTAL_AMOUNT_STR: &str = "Total Amount";
const EMPLOYMENT_STATUS_STR: &str = "Employment Status";
const UNIQUE_DONATION_DAYS_STR: &str = "Unique Donation Days";
const TOTAL_STR: &str = "Total";

/// One retained contributor, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    key: ContributorKey,
    aggregate: ContributorAggregate,
}

impl ReportRow {
    pub fn new(key: ContributorKey, aggregate: ContributorAggregate) -> Self {
        Self { key, aggregate }
    }

    pub fn key(&self) -> &ContributorKey {
        &self.key
    }

    pub fn aggregate(&self) -> &ContributorAggregate {
        &self.aggregate
    }

    pub fn metric(&self, mode: ReportMode) -> u64 {
        mode.metric(&self.aggregate)
    }

    /// The employer set joined with `", "`, or `Unknown` when it is empty.
    pub fn employment_status(&self) -> String {
        let employers = self.aggregate.employers();
        if employers.is_empty() {
            return UNKNOWN_EMPLOYER.to_string();
        }
        employers
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The cell values in the same order as `columns(mode)`.
    fn cells(&self, mode: ReportMode) -> Vec<String> {
        let mut cells = vec![
            self.key.name().to_string(),
            self.key.zip_code().to_string(),
            self.aggregate.donation_count().to_string(),
            self.aggregate.total_amount().to_string(),
            self.employment_status(),
        ];
        if mode == ReportMode::Days {
            cells.push(self.aggregate.unique_days().to_string());
        }
        cells
    }
}

/// Grand totals over the retained rows only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    total_amount: Amount,
    total_contributors: u64,
}

impl ReportTotals {
    /// Sums the retained rows. A grand total too large for an `Amount` is clamped and a warning
    /// is logged; the per-row totals are unaffected.
    pub fn of(rows: &[ReportRow]) -> Self {
        let mut overflowed = false;
        let total_amount = rows.iter().fold(Amount::ZERO, |total, row| {
            let amount = row.aggregate.total_amount();
            total.checked_add(amount).unwrap_or_else(|| {
                overflowed = true;
                total.saturating_add(amount)
            })
        });
        if overflowed {
            warn!("The total amount over {} contributors overflowed and was clamped", rows.len());
        }
        Self {
            total_amount,
            total_contributors: rows.len() as u64,
        }
    }

    pub fn total_amount(&self) -> Amount {
        self.total_amount
    }

    pub fn total_contributors(&self) -> u64 {
        self.total_contributors
    }
}

/// The final, ranked result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    mode: ReportMode,
    bounds: Bounds,
    rows: Vec<ReportRow>,
    totals: ReportTotals,
}

impl Report {
    /// Wraps already selected and ranked `rows`, computing their totals.
    pub fn new(mode: ReportMode, bounds: Bounds, rows: Vec<ReportRow>) -> Self {
        let totals = ReportTotals::of(&rows);
        Self {
            mode,
            bounds,
            rows,
            totals,
        }
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn totals(&self) -> ReportTotals {
        self.totals
    }

    /// The column headers for the active mode, shared by the console and CSV renderings.
    pub fn columns(&self) -> Vec<&'static str> {
        columns(self.mode)
    }

    /// The console rendering: a count line, one line per row, then the grand totals.
    pub fn console_lines(&self) -> Vec<String> {
        let phrase = metric_phrase(self.mode);
        let columns = self.columns();
        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        lines.push(format!(
            "Number of individual contributors with between {} {phrase}: {}",
            self.bounds, self.totals.total_contributors
        ));
        for row in &self.rows {
            let line = columns
                .iter()
                .zip(row.cells(self.mode))
                .map(|(label, value)| format!("{label}: {value}"))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(line);
        }
        lines.push(format!(
            "Total amount contributed by individuals with between {} {phrase}: {}",
            self.bounds, self.totals.total_amount
        ));
        lines.push(format!(
            "Total number of such contributors: {}",
            self.totals.total_contributors
        ));
        lines
    }

    /// Writes the CSV rendering to `path`. The file is only created here, after the tally is
    /// complete, so a failed scan never leaves a partial report behind.
    ///
    /// # Errors
    /// - Returns an error if the file or its parent directory cannot be created or written.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::create_parent_dir(path)?;
        let mut file = fs::create(path)?;
        self.write_csv_to(&mut file)
            .with_context(|| format!("Unable to write the report to {}", path.display()))?;
        fs::flush(path, &mut file)
    }

    /// Writes the CSV rendering: a header, one record per row, a blank record, then the totals.
    pub fn write_csv_to<W: Write>(&self, w: W) -> Result<()> {
        let columns = self.columns();
        let mut writer = csv::Writer::from_writer(w);
        writer.write_record(&columns)?;
        for row in &self.rows {
            writer.write_record(row.cells(self.mode))?;
        }
        writer.write_record(columns.iter().map(|_| ""))?;
        writer.write_record(self.totals_record())?;
        writer.flush()?;
        Ok(())
    }

    fn totals_record(&self) -> Vec<String> {
        let mut record = vec![String::new(); self.columns().len()];
        record[0] = TOTAL_STR.to_string();
        record[2] = self.totals.total_contributors.to_string();
        record[3] = self.totals.total_amount.to_string();
        record
    }
}

fn columns(mode: ReportMode) -> Vec<&'static str> {
    match mode {
        ReportMode::Count => vec![
            NAME_STR,
            ZIP_CODE_STR,
            NUMBER_OF_DONATIONS_STR,
            TOTAL_AMOUNT_STR,
            EMPLOYMENT_STATUS_STR,
        ],
        ReportMode::Days => vec![
            NAME_STR,
            ZIP_CODE_STR,
            CONTRIBUTIONS_STR,
            TOTAL_AMOUNT_STR,
            EMPLOYMENT_STATUS_STR,
            UNIQUE_DONATION_DAYS_STR,
        ],
    }
}

fn metric_phrase(mode: ReportMode) -> &'static str {
    match mode {
        ReportMode::Count => "donations",
        ReportMode::Days => "unique donation days",
    }
}
