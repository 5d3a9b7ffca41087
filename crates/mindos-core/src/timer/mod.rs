mod driver;
mod engine;
mod phase;

pub use driver::{TimerDriver, TimerHandle};
pub use engine::{TimerEngine, TimerSession, TimerState};
pub use phase::{Durations, Phase};
