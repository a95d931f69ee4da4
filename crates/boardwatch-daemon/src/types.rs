use std::fmt;
use std::time::Duration;

use boardwatch_config::{BoardConfig, BoardwatchConfig};

/// Poller settings, resolved from the `[polling]` section and board list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Boards in display order. The index of a board here is its view index.
    pub boards: Vec<BoardConfig>,
    pub refresh_interval: Duration,
    pub sweep_interval: Duration,
    /// Upper bound on each individual source request.
    pub request_timeout: Duration,
    pub auto_switch: bool,
    pub auto_switch_delay: Duration,
    /// Capacity of the redraw channel. Default: 16
    pub redraw_capacity: usize,
}

impl WatchConfig {
    pub fn from_config(config: &BoardwatchConfig) -> Self {
        Self {
            boards: config.boards.clone(),
            refresh_interval: config.polling.refresh_interval(),
            sweep_interval: config.polling.sweep_interval(),
            request_timeout: config.polling.request_timeout(),
            auto_switch: config.polling.auto_switch(),
            auto_switch_delay: config.polling.auto_switch_delay(),
            redraw_capacity: default_redraw_capacity(),
        }
    }

    pub fn board_index(&self, board_id: &str) -> Option<usize> {
        self.boards.iter().position(|b| b.id == board_id)
    }

    pub fn board_ids(&self) -> Vec<String> {
        self.boards.iter().map(|b| b.id.clone()).collect()
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::from_config(&BoardwatchConfig::default())
    }
}

fn default_redraw_capacity() -> usize {
    16
}

/// What caused a board refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The fixed-interval refresh timer.
    Timer,
    /// An explicit user request.
    Manual,
    /// The board just became the active view.
    Switch,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshTrigger::Timer => write!(f, "timer"),
            RefreshTrigger::Manual => write!(f, "manual"),
            RefreshTrigger::Switch => write!(f, "switch"),
        }
    }
}

/// Which view the presentation layer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    /// A single board, by index into the configured board list.
    Board(usize),
    /// The cross-board overview, one past the last board index.
    Aggregate,
}

impl ActiveView {
    pub fn board_index(&self) -> Option<usize> {
        match self {
            ActiveView::Board(index) => Some(*index),
            ActiveView::Aggregate => None,
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveView::Board(index) => write!(f, "board[{}]", index),
            ActiveView::Aggregate => write!(f, "aggregate"),
        }
    }
}

/// Hint to the presentation layer that visible state changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedrawRequest {
    BoardRefreshed { board_id: String },
    QueueAged,
    ViewChanged(ActiveView),
}
