//! Tallies individual contributions from FEC bulk data files.
//!
//! Lines flow one way through the crate: `model::Contribution` parses a line, `criteria` decides
//! whether it counts, `aggregator` folds it into per-contributor totals, `ranking` selects and
//! orders contributors once the scan is done, and `report` renders the result.

pub mod aggregator;
pub mod args;
pub mod commands;
mod config;
pub mod criteria;
mod error;
mod fs;
pub mod model;
pub mod ranking;
pub mod report;


pub use aggregator::Aggregator;
pub use config::TallyConfig;
pub use criteria::Criteria;
pub use error::Error;
pub use error::Result;
pub use ranking::{Bounds, ReportMode};
pub use report::Report;
