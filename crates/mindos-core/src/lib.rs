//! # MindOS Core Library
//!
//! Core business logic for the MindOS focus timer. The library is
//! UI-agnostic: the desktop or terminal front-end is a thin shell over the
//! same engine, consuming the event stream and rendering it however it
//! likes.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine. It owns no clock -- the
//!   caller (normally [`TimerDriver`]) invokes `tick()` once per elapsed
//!   second while the engine is running.
//! - **Driver**: a single async task that owns the engine plus the one
//!   repeating ticker, guaranteeing the ticker exists exactly while the
//!   engine is running.
//! - **Events**: every state change produces an [`Event`]; front-ends
//!   subscribe to the stream instead of polling internals.
//! - **Config**: TOML-based phase durations under `~/.config/mindos/`.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core countdown state machine
//! - [`TimerDriver`] / [`TimerHandle`]: clock ownership and command surface
//! - [`Config`]: phase duration configuration

pub mod config;
pub mod error;
pub mod events;
pub mod timer;

pub use config::Config;
pub use error::{ConfigError, CoreError, Result};
pub use events::Event;
pub use timer::{
    Durations, Phase, TimerDriver, TimerEngine, TimerHandle, TimerSession, TimerState,
};
