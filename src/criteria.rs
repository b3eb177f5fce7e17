//! The per-record filter: individual contributors only, a valid transaction date inside the
//! optional inclusive date range, and an optional exact state match.

use crate::model::{Contribution, TxDate};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// The entity type code for an individual contributor. Matched exactly, other codes such as
/// `ORG` or `PAC` are never aliased to it.
pub const INDIVIDUAL: &str = "IND";

/// The optional bounds a record must satisfy to be tallied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Criteria {
    state: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// Why a record was left out of the tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    NotIndividual,
    /// The transaction date was empty or not a real `MMDDYYYY` date.
    NoDate,
    BeforeStart,
    AfterEnd,
    OtherState,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rejection::NotIndividual => "not an individual",
            Rejection::NoDate => "no usable date",
            Rejection::BeforeStart => "before start date",
            Rejection::AfterEnd => "after end date",
            Rejection::OtherState => "other state",
        };
        f.write_str(s)
    }
}

/// The outcome of checking one record. A passing record carries its transaction day so the
/// caller does not have to unwrap the date a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass(NaiveDate),
    Reject(Rejection),
}

impl Criteria {
    pub fn new(
        state: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            state,
            start_date,
            end_date,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Checks `contribution` against every condition. All comparisons are exact and the date
    /// range is inclusive at both ends.
    pub fn check(&self, contribution: &Contribution<'_>) -> Verdict {
        if contribution.entity_type() != INDIVIDUAL {
            return Verdict::Reject(Rejection::NotIndividual);
        }
        let day = match contribution.date() {
            TxDate::Date(day) => day,
            TxDate::Empty | TxDate::Invalid => return Verdict::Reject(Rejection::NoDate),
        };
        if self.start_date.is_some_and(|start| day < start) {
            return Verdict::Reject(Rejection::BeforeStart);
        }
        if self.end_date.is_some_and(|end| day > end) {
            return Verdict::Reject(Rejection::AfterEnd);
        }
        if let Some(state) = self.state() {
            if contribution.state() != state {
                return Verdict::Reject(Rejection::OtherState);
            }
        }
        Verdict::Pass(day)
    }
}
