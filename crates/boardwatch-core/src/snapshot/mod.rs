pub mod errors;
pub mod persistence;
pub mod types;

pub use errors::StateError;
pub use persistence::{load_state, save_state};
pub use types::{AppState, BoardSnapshot, IssueSnapshot};
