//! Single-pass accumulation of per-contributor totals.

use crate::criteria::{Criteria, Rejection, Verdict};
use crate::model::{Contribution, ContributorAggregate, ContributorKey, KeyRef, Skip};
use crate::{fs, Result};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Contributors in the order their keys were first encountered. The ranking step relies on this
/// order to break ties.
pub type Contributors = IndexMap<ContributorKey, ContributorAggregate>;

/// Counts of what happened to each line during a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    lines: u64,
    aggregated: u64,
    skipped: BTreeMap<Skip, u64>,
    rejected: BTreeMap<Rejection, u64>,
}

impl ScanStats {
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Records that passed every check and were folded into an aggregate.
    pub fn aggregated(&self) -> u64 {
        self.aggregated
    }

    pub fn skipped(&self, reason: Skip) -> u64 {
        self.skipped.get(&reason).copied().unwrap_or_default()
    }

    pub fn rejected(&self, reason: Rejection) -> u64 {
        self.rejected.get(&reason).copied().unwrap_or_default()
    }
}

impl Display for ScanStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lines read, {} records tallied",
            self.lines, self.aggregated
        )?;
        for (reason, n) in &self.skipped {
            write!(f, ", {n} skipped ({reason})")?;
        }
        for (reason, n) in &self.rejected {
            write!(f, ", {n} filtered ({reason})")?;
        }
        Ok(())
    }
}

/// Holds the key to aggregate mapping for one run. Construct one per run and feed it lines; it
/// never re-reads anything, so memory grows with the number of distinct contributors rather than
/// the number of lines.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    criteria: Criteria,
    contributors: Contributors,
    stats: ScanStats,
}

impl Aggregator {
    pub fn new(criteria: Criteria) -> Self {
        Self {
            criteria,
            contributors: Contributors::new(),
            stats: ScanStats::default(),
        }
    }

    /// Parses, filters and tallies one raw line. Lines that are malformed or do not satisfy the
    /// criteria leave every aggregate untouched.
    pub fn push(&mut self, line: &str) {
        self.stats.lines += 1;
        let contribution = match Contribution::parse(line) {
            Ok(contribution) => contribution,
            Err(skip) => {
                trace!("Skipping line {} ({skip})", self.stats.lines);
                *self.stats.skipped.entry(skip).or_default() += 1;
                return;
            }
        };
        match self.criteria.check(&contribution) {
            Verdict::Pass(day) => {
                let aggregate = self.aggregate_mut(KeyRef::of(&contribution));
                match aggregate.add(contribution.employer(), day, contribution.amount()) {
                    Ok(()) => self.stats.aggregated += 1,
                    Err(skip) => {
                        warn!(
                            "Skipping line {} ({skip}): {} for {} does not fit in the total",
                            self.stats.lines,
                            contribution.amount().value(),
                            contribution.name()
                        );
                        *self.stats.skipped.entry(skip).or_default() += 1;
                    }
                }
            }
            Verdict::Reject(rejection) => {
                trace!("Filtered line {} ({rejection})", self.stats.lines);
                *self.stats.rejected.entry(rejection).or_default() += 1;
            }
        }
    }

    /// Feeds every line from `lines` through `push`.
    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.push(line.as_ref());
        }
    }

    /// Streams the file at `path` through `push`, one line at a time.
    ///
    /// # Errors
    /// - Returns an error if the file cannot be opened or read. Bad lines are never errors.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!("Reading contributions from {}", path.display());
        fs::for_each_line(path, |line| {
            self.push(line);
            Ok(())
        })?;
        debug!("Scan of {} complete: {}", path.display(), self.stats);
        Ok(())
    }

    fn aggregate_mut(&mut self, key: KeyRef<'_>) -> &mut ContributorAggregate {
        let ix = match self.contributors.get_index_of(&key) {
            Some(ix) => ix,
            None => {
                let (ix, _) = self
                    .contributors
                    .insert_full(key.to_owned_key(), ContributorAggregate::default());
                ix
            }
        };
        &mut self.contributors[ix]
    }

    pub fn contributors(&self) -> &Contributors {
        &self.contributors
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Ends the scan, handing over the completed mapping.
    pub fn finish(self) -> (Contributors, ScanStats) {
        (self.contributors, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TxDate;
    use crate::test::{fec_line, LineBuilder};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn key(name: &str, zip: &str) -> ContributorKey {
        ContributorKey::new(name, zip)
    }

    #[test]
    fn test_single_record() {
        let mut agg = Aggregator::default();
        agg.push(&fec_line(
            "Jane Doe",
            "10001",
            "NY",
            "Employer A",
            "01152023",
            "50.00",
        ));

        let contributors = agg.contributors();
        assert_eq!(contributors.len(), 1);
        let jane = &contributors[&key("Jane Doe", "10001")];
        assert_eq!(jane.donation_count(), 1);
        assert_eq!(jane.total_amount().to_string(), "$50.00");
        assert_eq!(jane.unique_days(), 1);
    }

    #[test]
    fn test_repeat_contributor_two_days() {
        let mut agg = Aggregator::default();
        agg.extend([
            fec_line("Jane Doe", "10001", "NY", "Employer A", "01152023", "50.00"),
            fec_line("Jane Doe", "10001", "NY", "Employer B", "01162023", "75.00"),
        ]);

        let jane = &agg.contributors()[&key("Jane Doe", "10001")];
        assert_eq!(jane.donation_count(), 2);
        assert_eq!(jane.total_amount().to_string(), "$125.00");
        assert_eq!(jane.unique_days(), 2);
        assert!(jane.employers().contains("Employer A"));
        assert!(jane.employers().contains("Employer B"));
    }

    #[test]
    fn test_key_is_name_and_zip() {
        let mut agg = Aggregator::default();
        agg.extend([
            fec_line("Jane Doe", "10001", "NY", "A", "01152023", "1"),
            fec_line("Jane Doe", "10002", "NY", "A", "01152023", "1"),
            fec_line("John Doe", "10001", "NY", "A", "01152023", "1"),
        ]);
        assert_eq!(agg.contributors().len(), 3);
    }

    #[test]
    fn test_short_line_is_ignored() {
        let mut agg = Aggregator::default();
        agg.push("C001|a|b|c|d|e|IND|Jane Doe|x|NY");
        assert!(agg.contributors().is_empty());
        assert_eq!(agg.stats().lines(), 1);
        assert_eq!(agg.stats().skipped(Skip::TooFewFields), 1);
        assert_eq!(agg.stats().aggregated(), 0);
    }

    #[test]
    fn test_empty_amount_never_reaches_aggregate() {
        let mut agg = Aggregator::default();
        agg.push(&LineBuilder::new().amount("").build());
        assert!(agg.contributors().is_empty());
        assert_eq!(agg.stats().skipped(Skip::MissingAmount), 1);
    }

    #[test]
    fn test_out_of_range_date_is_excluded() {
        let criteria = Criteria::default()
            .with_start_date(TxDate::parse("01012023").date().unwrap())
            .with_end_date(TxDate::parse("01312023").date().unwrap());
        let mut agg = Aggregator::new(criteria);
        agg.push(&LineBuilder::new().date("02012023").build());
        assert!(agg.contributors().is_empty());
        assert_eq!(agg.stats().rejected(Rejection::AfterEnd), 1);
    }

    #[test]
    fn test_insertion_order_is_first_seen() {
        let mut agg = Aggregator::default();
        agg.extend([
            LineBuilder::new().name("B").build(),
            LineBuilder::new().name("A").build(),
            LineBuilder::new().name("B").build(),
            LineBuilder::new().name("C").build(),
        ]);
        let names: Vec<&str> = agg.contributors().keys().map(|k| k.name()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_stats_add_up() {
        let mut agg = Aggregator::new(Criteria::default().with_state("NY"));
        agg.extend([
            LineBuilder::new().build(),
            LineBuilder::new().state("CA").build(),
            LineBuilder::new().entity_type("ORG").build(),
            LineBuilder::new().amount("x").build(),
            String::from("too|short"),
        ]);
        let stats = agg.stats();
        assert_eq!(stats.lines(), 5);
        assert_eq!(stats.aggregated(), 1);
        assert_eq!(stats.rejected(Rejection::OtherState), 1);
        assert_eq!(stats.rejected(Rejection::NotIndividual), 1);
        assert_eq!(stats.skipped(Skip::BadAmount), 1);
        assert_eq!(stats.skipped(Skip::TooFewFields), 1);
        assert_eq!(
            stats.to_string(),
            "5 lines read, 1 records tallied, 1 skipped (too few fields), \
            1 skipped (bad amount), 1 filtered (not an individual), 1 filtered (other state)"
        );
    }

    #[test]
    fn test_total_overflow_skips_the_line() {
        let mut agg = Aggregator::default();
        agg.extend([
            LineBuilder::new().amount("79228162514264337593543950335").build(),
            LineBuilder::new().amount("79228162514264337593543950335").build(),
            LineBuilder::new().amount("-5").build(),
        ]);

        let stats = agg.stats();
        assert_eq!(stats.lines(), 3);
        assert_eq!(stats.aggregated(), 2);
        assert_eq!(stats.skipped(Skip::TotalOverflow), 1);
        let (contributors, _) = agg.finish();
        assert_eq!(contributors[0].donation_count(), 2);
        assert_eq!(
            contributors[0].total_amount().value(),
            Decimal::MAX - Decimal::from(5)
        );
    }

    #[test]
    fn test_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("itcont.txt");
        let body = [
            LineBuilder::new().name("A").amount("10").build(),
            LineBuilder::new().name("A").amount("15").build(),
            String::from("garbage"),
        ]
        .join("\n");
        std::fs::write(&path, body).unwrap();

        let mut agg = Aggregator::default();
        agg.read_file(&path).unwrap();
        let (contributors, stats) = agg.finish();
        assert_eq!(stats.lines(), 3);
        assert_eq!(contributors.len(), 1);
        assert_eq!(contributors[0].total_amount().to_string(), "$25.00");
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut agg = Aggregator::default();
        assert!(agg.read_file(dir.path().join("missing.txt")).is_err());
    }
}
