//! Issue source trait definition.

use std::future::Future;

use crate::tracker::errors::SourceError;
use crate::tracker::types::{Issue, Iteration};

/// Trait defining the interface for issue tracker data sources.
///
/// A source is opaque to the engine: it turns a board id into its active
/// iterations, and an iteration into its member issues. Transport,
/// authentication and pagination are the implementation's concern.
pub trait IssueSource: Send + Sync + 'static {
    /// The canonical name of this source (e.g., "export-dir").
    fn name(&self) -> &'static str;

    /// Active iterations of a board. An empty list is a valid answer.
    fn active_iterations(
        &self,
        board_id: &str,
    ) -> impl Future<Output = Result<Vec<Iteration>, SourceError>> + Send;

    /// All issues belonging to one iteration of a board.
    fn iteration_issues(
        &self,
        board_id: &str,
        iteration_id: u64,
    ) -> impl Future<Output = Result<Vec<Issue>, SourceError>> + Send;
}
