//! Change reconciliation and pull/checkout engine.
//!
//! - [`types`] - Change events, per-file outcomes, batch/pull reports
//! - [`reconciler`] - Local change events to remote API mutations
//! - [`pull`] - Remote theme state to local files

pub mod pull;
pub mod reconciler;
pub mod types;

pub use pull::Puller;
pub use reconciler::Reconciler;
pub use types::{BatchReport, ChangeEvent, ChangeKind, FileOutcome, FileStatus, PullReport};
