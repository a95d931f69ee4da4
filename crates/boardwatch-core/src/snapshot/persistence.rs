//! State file persistence
//!
//! Reads and writes the snapshot store as a single JSON document with atomic
//! temp-file + rename writes.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::snapshot::errors::StateError;
use crate::snapshot::types::AppState;

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "state.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        tracing::warn!(
            event = "core.state.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
        );
    }
}

/// Load the state file, substituting an empty state when it is missing or unreadable.
///
/// Never fails: a fresh state means every board gets first-poll suppression again.
pub fn load_state(path: &Path) -> AppState {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(
                event = "core.state.load_missing",
                path = %path.display(),
            );
            return AppState::default();
        }
        Err(e) => {
            tracing::warn!(
                event = "core.state.load_failed",
                path = %path.display(),
                error = %e,
            );
            return AppState::default();
        }
    };

    match serde_json::from_str::<AppState>(&content) {
        Ok(mut state) => {
            // Older files may carry boards whose inner id was never written.
            for (id, board) in state.boards.iter_mut() {
                if board.board_id.is_empty() {
                    board.board_id = id.clone();
                }
            }
            tracing::info!(
                event = "core.state.load_completed",
                path = %path.display(),
                boards = state.boards.len(),
            );
            state
        }
        Err(e) => {
            tracing::warn!(
                event = "core.state.parse_failed",
                path = %path.display(),
                error = %e,
            );
            AppState::default()
        }
    }
}

/// Write the state file, stamping `last_run` with the current time.
pub fn save_state(state: &mut AppState, path: &Path) -> Result<(), StateError> {
    state.last_run = Utc::now();

    let json = serde_json::to_string_pretty(state)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StateError::WriteFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_file = temp_path(path);

    if let Err(e) = fs::write(&temp_file, &json) {
        cleanup_temp_file(&temp_file, &e);
        return Err(StateError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    if let Err(e) = fs::rename(&temp_file, path) {
        cleanup_temp_file(&temp_file, &e);
        return Err(StateError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    tracing::debug!(
        event = "core.state.save_completed",
        path = %path.display(),
        boards = state.boards.len(),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_yields_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state(&dir.path().join("state.json"));
        assert!(state.boards.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_yields_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        let state = load_state(&path);
        assert!(state.boards.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut state = AppState::default();
        state.update("A", "X-1", "Open", "Alice", "2024-01-01T00:00:00.000+0000");
        state.update("A", "X-2", "Done", "Unassigned", "garbage");
        state.update("B", "Y-1", "In Review", "Bob", "");
        state.board("C");

        save_state(&mut state, &path).unwrap();
        let loaded = load_state(&path);

        assert_eq!(loaded, state);
        assert!(loaded.peek_board("C").unwrap().is_empty());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_saved_file_uses_camel_case_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = AppState::default();
        state.update("42", "X-1", "Open", "Alice", "2024-01-01");
        save_state(&mut state, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.get("lastRun").is_some());
        let issue = &value["boards"]["42"]["issues"]["X-1"];
        assert_eq!(value["boards"]["42"]["boardId"], "42");
        assert_eq!(issue["key"], "X-1");
        assert_eq!(issue["status"], "Open");
        assert_eq!(issue["assignee"], "Alice");
        assert_eq!(issue["lastUpdate"], "2024-01-01");
        assert!(issue.get("lastSeen").is_some());
    }

    #[test]
    fn test_load_accepts_externally_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{
  "boards": {
    "7": {
      "boardId": "7",
      "issues": {
        "OPS-1": {
          "key": "OPS-1",
          "status": "Open",
          "assignee": "Unassigned",
          "lastUpdate": "2024-02-02T08:00:00.000+0000",
          "lastSeen": "2024-02-02T08:05:00.123456789+03:00"
        }
      }
    }
  },
  "lastRun": "2024-02-02T08:05:01Z"
}"#,
        )
        .unwrap();

        let state = load_state(&path);
        let snap = state.peek_board("7").unwrap().get("OPS-1").unwrap();
        assert_eq!(snap.status, "Open");
        assert_eq!(snap.assignee, "Unassigned");
    }

    #[test]
    fn test_load_fills_missing_board_id_from_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{
  "boards": {
    "7": {
      "issues": {
        "OPS-1": {
          "key": "OPS-1",
          "status": "Open",
          "assignee": "Alice",
          "lastUpdate": "2024-02-02T08:00:00.000+0000",
          "lastSeen": "2024-02-02T08:05:00Z"
        }
      }
    }
  },
  "lastRun": "2024-02-02T08:05:01Z"
}"#,
        )
        .unwrap();

        let state = load_state(&path);
        let board = state.peek_board("7").unwrap();
        assert_eq!(board.board_id, "7");
        assert_eq!(board.get("OPS-1").unwrap().assignee, "Alice");
    }

    #[test]
    fn test_load_without_last_run_keeps_boards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{
  "boards": {
    "7": {
      "boardId": "7",
      "issues": {
        "OPS-1": {
          "key": "OPS-1",
          "status": "In Progress",
          "assignee": "Bob",
          "lastUpdate": "2024-02-02T08:00:00.000+0000",
          "lastSeen": "2024-02-02T08:05:00Z"
        }
      }
    }
  }
}"#,
        )
        .unwrap();

        let state = load_state(&path);
        assert_eq!(state.boards.len(), 1);
        let snap = state.peek_board("7").unwrap().get("OPS-1").unwrap();
        assert_eq!(snap.status, "In Progress");
    }

    #[test]
    fn test_save_to_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let mut state = AppState::default();
        let result = save_state(&mut state, &blocker.join("state.json"));
        assert!(matches!(result, Err(StateError::WriteFailed { .. })));
    }
}
