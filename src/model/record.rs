//! Parsing of FEC individual-contribution lines.
//!
//! The file layout is documented at
//! https://www.fec.gov/campaign-finance-data/contributions-individuals-file-description/
//! Only the handful of columns needed for tallying are extracted.

use crate::model::{Amount, AmountError, TxDate};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Field separator used by FEC bulk files.
pub const DELIMITER: char = '|';

/// Lines with fewer fields than this are structurally unusable.
pub const MIN_FIELDS: usize = 15;

pub(crate) const CMTE_ID_IDX: usize = 0;
pub(crate) const ENTITY_TP_IDX: usize = 6;
pub(crate) const NAME_IDX: usize = 7;
pub(crate) const STATE_IDX: usize = 9;
pub(crate) const ZIP_CODE_IDX: usize = 10;
pub(crate) const EMPLOYER_IDX: usize = 11;
pub(crate) const TRANSACTION_DT_IDX: usize = 13;
pub(crate) const TRANSACTION_AMT_IDX: usize = 14;

/// One input line split into its trimmed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'a> {
    fields: Vec<&'a str>,
}

impl<'a> RawRecord<'a> {
    pub fn split(line: &'a str) -> Self {
        Self {
            fields: line.split(DELIMITER).map(str::trim).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The trimmed field at `ix`, or `None` if the line is too short.
    pub fn field(&self, ix: usize) -> Option<&'a str> {
        self.fields.get(ix).copied()
    }

    /// Whether the line has enough fields to be parsed into a `Contribution`.
    pub fn is_eligible(&self) -> bool {
        self.len() >= MIN_FIELDS
    }
}

/// The reason a line was not tallied. Most are found while parsing; `TotalOverflow` is only found
/// once the contribution is added to its contributor's running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Skip {
    /// Fewer than `MIN_FIELDS` fields.
    TooFewFields,
    /// The transaction amount field was blank.
    MissingAmount,
    /// The transaction amount field was not a number.
    BadAmount,
    /// Adding the amount would overflow the contributor's total.
    TotalOverflow,
}

impl Display for Skip {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Skip::TooFewFields => "too few fields",
            Skip::MissingAmount => "missing amount",
            Skip::BadAmount => "bad amount",
            Skip::TotalOverflow => "total overflow",
        };
        f.write_str(s)
    }
}

/// The subset of an FEC line that tallying needs. Borrows from the line it was parsed from and is
/// consumed before the next line is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution<'a> {
    pub(crate) entity_type: &'a str,
    pub(crate) name: &'a str,
    pub(crate) zip_code: &'a str,
    pub(crate) state: &'a str,
    pub(crate) employer: &'a str,
    pub(crate) date: TxDate,
    pub(crate) amount: Amount,
}

impl<'a> Contribution<'a> {
    /// Parses one raw line. Malformed lines are an expected, frequent case, so the outcome is a
    /// `Skip` reason rather than an error.
    pub fn parse(line: &'a str) -> Result<Self, Skip> {
        Self::from_raw(&RawRecord::split(line))
    }

    pub fn from_raw(raw: &RawRecord<'a>) -> Result<Self, Skip> {
        if !raw.is_eligible() {
            return Err(Skip::TooFewFields);
        }
        // Eligibility guarantees every index below MIN_FIELDS is present.
        let field = |ix: usize| raw.field(ix).unwrap_or_default();

        let amount = match Amount::from_str(field(TRANSACTION_AMT_IDX)) {
            Ok(amount) => amount,
            Err(AmountError::Empty) => return Err(Skip::MissingAmount),
            Err(AmountError::Invalid(_)) => return Err(Skip::BadAmount),
        };

        Ok(Self {
            entity_type: field(ENTITY_TP_IDX),
            name: field(NAME_IDX),
            zip_code: field(ZIP_CODE_IDX),
            state: field(STATE_IDX),
            employer: field(EMPLOYER_IDX),
            date: TxDate::parse(field(TRANSACTION_DT_IDX)),
            amount,
        })
    }

    pub fn entity_type(&self) -> &'a str {
        self.entity_type
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn zip_code(&self) -> &'a str {
        self.zip_code
    }

    pub fn state(&self) -> &'a str {
        self.state
    }

    pub fn employer(&self) -> &'a str {
        self.employer
    }

    pub fn date(&self) -> TxDate {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}
