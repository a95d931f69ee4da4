//! Issue source backed by a directory of tracker exports.
//!
//! Layout, one directory per board:
//!
//! ```text
//! <root>/<board_id>/sprints.json        {"values": [{"id": 7, "name": "...", "state": "active"}]}
//! <root>/<board_id>/sprint-<id>.json    {"issues": [...]}
//! ```
//!
//! Files are re-read on every request, so an external exporter can replace
//! them between polls.

use std::io;
use std::path::{Path, PathBuf};

use boardwatch_core::tracker::types::{IssuePage, IterationPage};
use boardwatch_core::{Issue, IssueSource, Iteration, SourceError};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ExportDirSource {
    root: PathBuf,
}

impl ExportDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn board_dir(&self, board_id: &str) -> PathBuf {
        self.root.join(board_id.replace(['/', '\\'], "_"))
    }

    fn iterations_file(&self, board_id: &str) -> PathBuf {
        self.board_dir(board_id).join("sprints.json")
    }

    fn issues_file(&self, board_id: &str, iteration_id: u64) -> PathBuf {
        self.board_dir(board_id)
            .join(format!("sprint-{}.json", iteration_id))
    }
}

async fn read_export(path: &Path, board_id: &str) -> Result<String, SourceError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SourceError::BoardNotFound {
            board_id: board_id.to_string(),
        }),
        Err(e) => Err(SourceError::IoError { source: e }),
    }
}

fn parse_failed(path: &Path, e: serde_json::Error) -> SourceError {
    SourceError::ParseFailed {
        what: path.display().to_string(),
        message: e.to_string(),
    }
}

impl IssueSource for ExportDirSource {
    fn name(&self) -> &'static str {
        "export-dir"
    }

    async fn active_iterations(&self, board_id: &str) -> Result<Vec<Iteration>, SourceError> {
        let path = self.iterations_file(board_id);
        let content = read_export(&path, board_id).await?;
        let page: IterationPage =
            serde_json::from_str(&content).map_err(|e| parse_failed(&path, e))?;

        let iterations: Vec<Iteration> =
            page.values.into_iter().filter(Iteration::is_active).collect();
        debug!(
            event = "daemon.source.iterations_loaded",
            board_id = board_id,
            count = iterations.len(),
        );
        Ok(iterations)
    }

    async fn iteration_issues(
        &self,
        board_id: &str,
        iteration_id: u64,
    ) -> Result<Vec<Issue>, SourceError> {
        let path = self.issues_file(board_id, iteration_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SourceError::RequestFailed {
                    message: format!(
                        "no export for iteration {} of board '{}'",
                        iteration_id, board_id
                    ),
                });
            }
            Err(e) => return Err(SourceError::IoError { source: e }),
        };
        let page: IssuePage = serde_json::from_str(&content).map_err(|e| parse_failed(&path, e))?;

        debug!(
            event = "daemon.source.issues_loaded",
            board_id = board_id,
            iteration_id = iteration_id,
            count = page.issues.len(),
        );
        Ok(page.issues)
    }
}
