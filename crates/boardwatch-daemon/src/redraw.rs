//! Coalescing redraw notifications.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, trace};

use crate::types::RedrawRequest;

/// Create the bounded channel the poller signals redraws on.
pub fn redraw_channel(
    capacity: usize,
) -> (mpsc::Sender<RedrawRequest>, mpsc::Receiver<RedrawRequest>) {
    mpsc::channel(capacity.max(1))
}

/// Signal a redraw without waiting.
///
/// A full channel already guarantees a pending redraw, so the request is
/// dropped. A closed channel means nobody is displaying anything.
pub fn request_redraw(tx: &mpsc::Sender<RedrawRequest>, request: RedrawRequest) {
    match tx.try_send(request) {
        Ok(()) => {}
        Err(TrySendError::Full(request)) => {
            trace!(event = "daemon.redraw.coalesced", request = ?request);
        }
        Err(TrySendError::Closed(_)) => {
            debug!(event = "daemon.redraw.receiver_closed");
        }
    }
}
