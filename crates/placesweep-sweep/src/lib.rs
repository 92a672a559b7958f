//! Area-constrained incremental search aggregation.
//!
//! A [`Session`] owns the accumulated, deduplicated result set together with
//! the [`ViewReconciler`] that mirrors it. A [`Sweeper`] starts [`Run`]s: one
//! query against the session's active region, paged to exhaustion, merged
//! into the session one page at a time.

pub mod error;
pub mod export;
pub mod session;
pub mod sweeper;
pub mod view;

pub use error::SweepError;
pub use export::{export_rows, ExportRow};
pub use session::{MergeOutcome, Session};
pub use sweeper::{Run, RunStatus, RunSummary, Sweeper, DEFAULT_MAX_PAGES};
pub use view::{Marker, MarkerBoard, MarkerHandle, ViewReconciler};
