//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not own a clock
//! or internal threads - the caller invokes `tick()` once per elapsed second
//! while the engine is running (see [`super::driver`] for the task that
//! normally does this).
//!
//! ## State Transitions
//!
//! ```text
//! FocusIdle <-> FocusRunning --(countdown hits 0)--> BreakIdle
//! BreakIdle <-> BreakRunning --(countdown hits 0)--> FocusIdle
//! ```
//!
//! The countdown-to-zero transition is atomic: the decrement, the
//! `SessionCompleted` event, the phase switch, and the stop all happen
//! inside one `tick()` call, so no caller ever observes a running engine
//! with zero seconds remaining.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::{Durations, Phase};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// Observable snapshot of the engine, handed to front-ends for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSession {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub is_running: bool,
    /// Focus phases finished since engine creation. Counts only natural
    /// countdown completions, never manual resets or phase switches.
    pub completed_focus: u32,
}

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    durations: Durations,
    phase: Phase,
    state: TimerState,
    /// Remaining time in seconds for the current phase.
    remaining_secs: u64,
    completed_focus: u32,
}

impl TimerEngine {
    /// Create a new engine: focus phase, full countdown, not running.
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            phase: Phase::Focus,
            state: TimerState::Idle,
            remaining_secs: durations.duration_secs(Phase::Focus),
            completed_focus: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn completed_focus(&self) -> u32 {
        self.completed_focus
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Nominal length of the current phase in seconds.
    pub fn total_secs(&self) -> u64 {
        self.durations.duration_secs(self.phase)
    }

    /// 0.0 .. 100.0 progress within the current phase.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs as f64 / total as f64) * 100.0
    }

    pub fn session(&self) -> TimerSession {
        TimerSession {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            is_running: self.is_running(),
            completed_focus: self.completed_focus,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            running: self.is_running(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            progress_pct: self.progress_pct(),
            completed_focus: self.completed_focus,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. No-op when already running or when the phase
    /// has no time left (only reachable with zero-length durations).
    pub fn start(&mut self) -> Option<Event> {
        if self.state == TimerState::Running || self.remaining_secs == 0 {
            return None;
        }
        self.state = TimerState::Running;
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop counting down, preserving the remaining time. No-op when idle.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Idle;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// One elapsed second. Returns `Some(Event::SessionCompleted)` when the
    /// countdown reaches zero; the engine is then idle in the next phase
    /// with a full countdown. No-op when idle.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let finished = self.phase;
        if finished == Phase::Focus {
            self.completed_focus += 1;
        }
        self.phase = finished.other();
        self.remaining_secs = self.durations.duration_secs(self.phase);
        self.state = TimerState::Idle;
        Some(Event::SessionCompleted {
            phase: finished,
            duration_min: self.durations.duration_min(finished),
            completed_focus: self.completed_focus,
            at: Utc::now(),
        })
    }

    /// Restore the current phase's full countdown and stop. Keeps the phase
    /// and the completed-focus count.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.remaining_secs = self.total_secs();
        Some(Event::TimerReset {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Hard override to `target`: full countdown, stopped. Discards any
    /// elapsed progress in the current phase and keeps the completed-focus
    /// count. Allowed regardless of running state.
    pub fn switch_phase(&mut self, target: Phase) -> Option<Event> {
        self.phase = target;
        self.state = TimerState::Idle;
        self.remaining_secs = self.durations.duration_secs(target);
        Some(Event::PhaseSwitched {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_to_completion(engine: &mut TimerEngine) -> Vec<Event> {
        let mut completions = Vec::new();
        engine.start();
        while engine.is_running() {
            if let Some(event) = engine.tick() {
                completions.push(event);
            }
        }
        completions
    }

    #[test]
    fn new_engine_is_focus_idle_full() {
        let engine = TimerEngine::default();
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 1500);
        assert_eq!(engine.completed_focus(), 0);
    }

    #[test]
    fn start_pause_round_trip_preserves_remaining() {
        let mut engine = TimerEngine::default();
        assert!(engine.start().is_some());
        for _ in 0..600 {
            engine.tick();
        }
        assert_eq!(engine.remaining_secs(), 900);

        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 900);

        assert!(engine.start().is_some());
        assert_eq!(engine.remaining_secs(), 900);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut engine = TimerEngine::default();
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
    }

    #[test]
    fn pause_while_idle_is_noop() {
        let mut engine = TimerEngine::default();
        assert!(engine.pause().is_none());
    }

    #[test]
    fn tick_while_idle_is_noop() {
        let mut engine = TimerEngine::default();
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 1500);
    }

    #[test]
    fn focus_countdown_completes_into_break_idle() {
        let mut engine = TimerEngine::default();
        let completions = run_to_completion(&mut engine);

        assert_eq!(completions.len(), 1);
        match &completions[0] {
            Event::SessionCompleted {
                phase,
                duration_min,
                completed_focus,
                ..
            } => {
                assert_eq!(*phase, Phase::Focus);
                assert_eq!(*duration_min, 25);
                assert_eq!(*completed_focus, 1);
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 300);
        assert_eq!(engine.completed_focus(), 1);
    }

    #[test]
    fn break_countdown_returns_to_focus_without_counting() {
        let mut engine = TimerEngine::default();
        run_to_completion(&mut engine);
        assert_eq!(engine.phase(), Phase::Break);

        let completions = run_to_completion(&mut engine);
        assert_eq!(completions.len(), 1);
        match &completions[0] {
            Event::SessionCompleted {
                phase,
                duration_min,
                completed_focus,
                ..
            } => {
                assert_eq!(*phase, Phase::Break);
                assert_eq!(*duration_min, 5);
                assert_eq!(*completed_focus, 1);
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 1500);
        assert_eq!(engine.completed_focus(), 1);
    }

    #[test]
    fn exactly_one_completion_per_full_focus_countdown() {
        let mut engine = TimerEngine::default();
        engine.start();
        let mut completions = 0;
        for _ in 0..1500 {
            if engine.tick().is_some() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(engine.completed_focus(), 1);
    }

    #[test]
    fn reset_restores_current_phase_duration() {
        let mut engine = TimerEngine::default();
        engine.start();
        for _ in 0..777 {
            engine.tick();
        }
        engine.reset();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 1500);
        assert_eq!(engine.completed_focus(), 0);
    }

    #[test]
    fn reset_in_break_keeps_break_phase() {
        let mut engine = TimerEngine::default();
        run_to_completion(&mut engine);
        engine.start();
        for _ in 0..100 {
            engine.tick();
        }
        engine.reset();
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 300);
        assert_eq!(engine.completed_focus(), 1);
    }

    #[test]
    fn switch_phase_while_running_discards_progress_and_stops() {
        let mut engine = TimerEngine::default();
        engine.start();
        for _ in 0..600 {
            engine.tick();
        }
        assert_eq!(engine.remaining_secs(), 900);

        let event = engine.switch_phase(Phase::Break);
        assert!(matches!(event, Some(Event::PhaseSwitched { .. })));
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 300);
        assert_eq!(engine.completed_focus(), 0);
    }

    #[test]
    fn switch_phase_never_counts_a_session() {
        let mut engine = TimerEngine::default();
        engine.switch_phase(Phase::Break);
        engine.switch_phase(Phase::Focus);
        engine.switch_phase(Phase::Break);
        assert_eq!(engine.completed_focus(), 0);
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut engine = TimerEngine::default();
        engine.start();
        for _ in 0..750 {
            engine.tick();
        }
        match engine.snapshot() {
            Event::StateSnapshot {
                running,
                remaining_secs,
                total_secs,
                progress_pct,
                ..
            } => {
                assert!(running);
                assert_eq!(remaining_secs, 750);
                assert_eq!(total_secs, 1500);
                assert!((progress_pct - 50.0).abs() < 1e-9);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    proptest! {
        /// Remaining time decreases by exactly 1 per running tick and never
        /// goes negative, across arbitrary command interleavings.
        #[test]
        fn remaining_stays_within_nominal_bounds(ops in prop::collection::vec(0u8..5, 0..2000)) {
            let mut engine = TimerEngine::default();
            for op in ops {
                let before = engine.remaining_secs();
                let was_running = engine.is_running();
                match op {
                    0 => { engine.start(); }
                    1 => { engine.pause(); }
                    2 => {
                        if engine.tick().is_none() && was_running {
                            prop_assert_eq!(engine.remaining_secs(), before - 1);
                        }
                    }
                    3 => { engine.reset(); }
                    _ => { engine.switch_phase(engine.phase().other()); }
                }
                prop_assert!(engine.remaining_secs() <= engine.total_secs());
                if engine.is_running() {
                    prop_assert!(engine.remaining_secs() > 0);
                }
            }
        }
    }
}
