//! Async driver that owns the engine and its clock.
//!
//! The engine itself is tick-driven and clockless. The driver is the single
//! producer of `tick()` calls: one task owns the [`TimerEngine`] together
//! with an optional repeating [`tokio::time::Interval`]. The interval exists
//! exactly while the engine is running - it is created on a successful start
//! and dropped on pause, reset, phase switch, and the countdown-to-zero
//! transition. A second concurrent ticker (the classic double-decrement
//! bug) is therefore unrepresentable.
//!
//! Commands arrive over an mpsc channel via [`TimerHandle`]; every state
//! change is forwarded on the event channel as the concrete event followed
//! by a `StateSnapshot` for rendering.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};

use super::engine::{TimerEngine, TimerSession};
use super::phase::Phase;
use crate::error::{CoreError, Result};
use crate::events::Event;

enum Command {
    Start,
    Pause,
    Reset,
    SwitchPhase(Phase),
    Session(oneshot::Sender<TimerSession>),
}

/// Command surface for a spawned driver task.
#[derive(Clone)]
pub struct TimerHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl TimerHandle {
    pub fn start(&self) -> Result<()> {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    pub fn switch_phase(&self, target: Phase) -> Result<()> {
        self.send(Command::SwitchPhase(target))
    }

    /// Current session snapshot, observed by the driver task itself so it
    /// is ordered after any commands sent earlier on this handle.
    pub async fn session(&self) -> Result<TimerSession> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Session(reply_tx))?;
        reply_rx.await.map_err(|_| CoreError::DriverClosed)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).map_err(|_| CoreError::DriverClosed)
    }
}

/// Spawns and wires up the driver task.
pub struct TimerDriver;

impl TimerDriver {
    /// Spawn a driver ticking once per second.
    pub fn spawn(engine: TimerEngine) -> (TimerHandle, mpsc::UnboundedReceiver<Event>) {
        Self::spawn_with_period(engine, Duration::from_secs(1))
    }

    /// Spawn a driver with a custom tick period. The countdown semantics
    /// are unchanged: one tick is one simulated second.
    pub fn spawn_with_period(
        mut engine: TimerEngine,
        period: Duration,
    ) -> (TimerHandle, mpsc::UnboundedReceiver<Event>) {
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

        tokio::spawn(async move {
            let mut ticker: Option<Interval> = None;
            loop {
                tokio::select! {
                    cmd = cmd_rx.recv() => {
                        let Some(cmd) = cmd else { break };
                        match cmd {
                            Command::Start => {
                                if let Some(event) = engine.start() {
                                    ticker = Some(new_ticker(period));
                                    emit(&event_tx, event, &engine);
                                }
                            }
                            Command::Pause => {
                                if let Some(event) = engine.pause() {
                                    ticker = None;
                                    emit(&event_tx, event, &engine);
                                }
                            }
                            Command::Reset => {
                                ticker = None;
                                if let Some(event) = engine.reset() {
                                    emit(&event_tx, event, &engine);
                                }
                            }
                            Command::SwitchPhase(target) => {
                                ticker = None;
                                if let Some(event) = engine.switch_phase(target) {
                                    emit(&event_tx, event, &engine);
                                }
                            }
                            Command::Session(reply) => {
                                let _ = reply.send(engine.session());
                            }
                        }
                    }
                    _ = next_tick(&mut ticker), if ticker.is_some() => {
                        match engine.tick() {
                            Some(event) => {
                                // Zero boundary: the clock stops with the phase switch.
                                ticker = None;
                                emit(&event_tx, event, &engine);
                            }
                            None => {
                                let _ = event_tx.send(engine.snapshot());
                            }
                        }
                    }
                }
            }
        });

        (TimerHandle { tx: cmd_tx }, event_rx)
    }
}

fn new_ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // A fresh interval fires immediately; push the first tick one period out.
    interval.reset();
    interval
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn emit(tx: &mpsc::UnboundedSender<Event>, event: Event, engine: &TimerEngine) {
    let _ = tx.send(event);
    let _ = tx.send(engine.snapshot());
}
