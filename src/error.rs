//! Crate-wide error aliases. Only whole-file I/O and argument failures travel this way; anomalies
//! in individual records are reported through explicit outcome types instead.

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
