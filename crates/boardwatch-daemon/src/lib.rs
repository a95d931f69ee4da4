pub mod errors;
pub mod orchestrator;
pub mod redraw;
pub mod selector;
pub mod server;
pub mod source;
pub mod sweeper;
pub mod types;

// Primary re-exports
pub use errors::DaemonError;
pub use orchestrator::PollOrchestrator;
pub use redraw::{redraw_channel, request_redraw};
pub use selector::BoardSelector;
pub use server::shutdown::wait_for_shutdown_signal;
pub use server::{run_orchestrator, run_watch};
pub use source::ExportDirSource;
pub use types::{ActiveView, RedrawRequest, RefreshTrigger, WatchConfig};
