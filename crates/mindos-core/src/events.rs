use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the engine produces an Event.
/// Front-ends subscribe to the stream; `StateSnapshot` is the render
/// payload emitted after each change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Manual phase override. Distinct from the natural switch that
    /// `SessionCompleted` implies: this one discards elapsed progress.
    PhaseSwitched {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase counted down to zero. `duration_min` is the nominal phase
    /// length, not elapsed wall time.
    SessionCompleted {
        phase: Phase,
        duration_min: u64,
        completed_focus: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        completed_focus: u32,
        at: DateTime<Utc>,
    },
}
