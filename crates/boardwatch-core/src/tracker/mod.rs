pub mod errors;
pub mod traits;
pub mod types;

pub use errors::SourceError;
pub use traits::IssueSource;
pub use types::{Issue, IssueFields, Iteration, UNASSIGNED};
