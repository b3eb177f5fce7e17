//! Types that represent the core data model, such as `Contribution` and `ContributorAggregate`.
mod amount;
mod contributor;
mod date;
pub mod record;

pub use amount::{Amount, AmountError};
pub(crate) use contributor::KeyRef;
pub use contributor::{ContributorAggregate, ContributorKey};
pub use date::TxDate;
pub use record::{Contribution, RawRecord, Skip};
