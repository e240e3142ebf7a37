//! Derived project views: standups, weekly client reports, risk analysis,
//! dashboard stats and tone rewrites, computed from the live store or from
//! static mock snapshots.

use db::DbErr;
use thiserror::Error;

pub mod blockers;
pub mod dashboard;
pub mod mock_data;
pub mod risk;
pub mod snapshot;
pub mod source;
pub mod standup;
pub mod tone;
pub mod views;
pub mod weekly;

pub use mock_data::MockData;
pub use snapshot::Snapshot;
pub use source::{AutoSource, LiveStore, ReportData, ReportSource, StaticFallback};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// `floor(100 * done / total)`, or 0 for an empty project.
pub fn progress_percent(done: usize, total: usize) -> u64 {
    if total == 0 {
        0
    } else {
        (done as u64 * 100) / total as u64
    }
}

#[cfg(test)]
pub(crate) mod fixtures;
