pub mod queue;
pub mod types;

pub use queue::{ChangeQueue, SweepOutcome};
pub use types::{
    ChangeNotification, RetentionState, describe_change, highlight_window, retention_window,
};
