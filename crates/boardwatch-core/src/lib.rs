//! Core library for boardwatch.
//!
//! Holds the snapshot store, change detection, change aging and the shared
//! [`BoardStore`] that the poller drives.

pub mod activity;
pub mod changes;
pub mod detector;
pub mod errors;
pub mod logging;
pub mod snapshot;
pub mod store;
pub mod tracker;

pub use activity::{ActivityEntry, ActivityKind};
pub use changes::{ChangeNotification, ChangeQueue, RetentionState, SweepOutcome};
pub use detector::{DetectionOutcome, detect_changes};
pub use errors::BoardwatchError;
pub use logging::init_logging;
pub use snapshot::{AppState, BoardSnapshot, IssueSnapshot, StateError};
pub use store::{BoardStore, BoardSummary, RefreshOutcome};
pub use tracker::{Issue, IssueSource, Iteration, SourceError, UNASSIGNED};
