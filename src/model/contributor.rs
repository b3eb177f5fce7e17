use crate::model::{Amount, Contribution, Skip};
use chrono::NaiveDate;
use indexmap::Equivalent;
use serde::Serialize;
use std::collections::BTreeSet;

/// The identity under which contributions are tallied: the contributor's name and ZIP code as they
/// appear in the file. This is not a verified person, two records with the same name and ZIP are
/// simply treated as the same contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ContributorKey {
    name: String,
    zip_code: String,
}

impl ContributorKey {
    pub fn new(name: impl Into<String>, zip_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zip_code: zip_code.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }
}

/// A borrowed `ContributorKey` used for lookups so that a contributor who has already been seen
/// costs no allocation.
///
/// Hashes identically to `ContributorKey`: the derived impls hash the same two strings in the
/// same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct KeyRef<'a> {
    name: &'a str,
    zip_code: &'a str,
}

impl<'a> KeyRef<'a> {
    pub(crate) fn of(contribution: &Contribution<'a>) -> Self {
        Self {
            name: contribution.name(),
            zip_code: contribution.zip_code(),
        }
    }

    pub(crate) fn to_owned_key(self) -> ContributorKey {
        ContributorKey::new(self.name, self.zip_code)
    }
}

impl Equivalent<ContributorKey> for KeyRef<'_> {
    fn equivalent(&self, key: &ContributorKey) -> bool {
        self.name == key.name && self.zip_code == key.zip_code
    }
}

/// Running totals for one contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContributorAggregate {
    donation_count: u64,
    total_amount: Amount,
    employers: BTreeSet<String>,
    donation_days: BTreeSet<NaiveDate>,
}

impl ContributorAggregate {
    /// Folds one qualifying contribution into the totals. If the amount would overflow the
    /// running total the aggregate is left untouched and `Skip::TotalOverflow` is returned.
    pub(crate) fn add(
        &mut self,
        employer: &str,
        day: NaiveDate,
        amount: Amount,
    ) -> Result<(), Skip> {
        let total_amount = self
            .total_amount
            .checked_add(amount)
            .ok_or(Skip::TotalOverflow)?;
        self.donation_count += 1;
        self.total_amount = total_amount;
        if !self.employers.contains(employer) {
            self.employers.insert(employer.to_string());
        }
        self.donation_days.insert(day);
        Ok(())
    }

    pub fn donation_count(&self) -> u64 {
        self.donation_count
    }

    pub fn total_amount(&self) -> Amount {
        self.total_amount
    }

    /// Every distinct employer string seen for this contributor, in sorted order.
    pub fn employers(&self) -> &BTreeSet<String> {
        &self.employers
    }

    pub fn donation_days(&self) -> &BTreeSet<NaiveDate> {
        &self.donation_days
    }

    /// The number of distinct calendar days with at least one qualifying donation.
    pub fn unique_days(&self) -> u64 {
        self.donation_days.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::str::FromStr;

    fn hash_of(value: &impl Hash) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    #[test]
    fn test_key_ref_hashes_like_key() {
        let key = ContributorKey::new("DOE, JANE", "10001");
        let key_ref = KeyRef {
            name: "DOE, JANE",
            zip_code: "10001",
        };
        assert_eq!(hash_of(&key), hash_of(&key_ref));
        assert!(key_ref.equivalent(&key));
        assert_eq!(key_ref.to_owned_key(), key);
    }

    #[test]
    fn test_add_accumulates() {
        let mut agg = ContributorAggregate::default();
        agg.add("A", day(1, 15), Amount::from_str("50.00").unwrap()).unwrap();
        agg.add("B", day(1, 16), Amount::from_str("75.00").unwrap()).unwrap();

        assert_eq!(agg.donation_count(), 2);
        assert_eq!(agg.total_amount().to_string(), "$125.00");
        assert_eq!(agg.unique_days(), 2);
        assert_eq!(agg.employers().iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_same_day_counts_once() {
        let mut agg = ContributorAggregate::default();
        for _ in 0..3 {
            agg.add("A", day(3, 1), Amount::from_str("10").unwrap()).unwrap();
        }

        assert_eq!(agg.donation_count(), 3);
        assert_eq!(agg.unique_days(), 1);
        assert_eq!(agg.employers().len(), 1);
    }

    #[test]
    fn test_overflow_leaves_aggregate_untouched() {
        let max = Amount::from_str("79228162514264337593543950335").unwrap();
        let mut agg = ContributorAggregate::default();
        agg.add("A", day(1, 15), max).unwrap();
        let before = agg.clone();

        assert_eq!(agg.add("B", day(1, 16), max), Err(Skip::TotalOverflow));
        assert_eq!(agg, before);
    }
}
