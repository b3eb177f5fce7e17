use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

/// The only date layout used by FEC bulk files and by the command line: `MMDDYYYY`.
const DATE_FORMAT: &str = "%m%d%Y";
const DATE_LEN: usize = 8;

/// The outcome of normalizing an `MMDDYYYY` string.
///
/// Both `Empty` and `Invalid` mean "no usable date". They are kept apart so that callers can
/// say which one happened, but every caller treats them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxDate {
    Date(NaiveDate),
    /// The input was empty or only whitespace.
    Empty,
    /// The input was present but is not a real calendar date in `MMDDYYYY` form.
    Invalid,
}

impl TxDate {
    /// Normalizes `s`, which is trimmed first.
    ///
    /// chrono's numeric specifiers accept fewer digits than their full width, so the length and
    /// digit checks happen here to keep the grammar exactly eight digits.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return TxDate::Empty;
        }
        if s.len() != DATE_LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
            return TxDate::Invalid;
        }
        match NaiveDate::parse_from_str(s, DATE_FORMAT) {
            Ok(date) => TxDate::Date(date),
            Err(_) => TxDate::Invalid,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TxDate::Date(date) => Some(*date),
            TxDate::Empty | TxDate::Invalid => None,
        }
    }
}

impl Display for TxDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TxDate::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            TxDate::Empty => f.write_str("(empty)"),
            TxDate::Invalid => f.write_str("(invalid)"),
        }
    }
}
