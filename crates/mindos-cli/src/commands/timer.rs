use std::time::Duration;

use clap::Subcommand;
use mindos_core::{Config, Durations, Event, TimerDriver, TimerEngine};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground, printing events as JSON lines
    Run {
        /// Focus phase length in minutes (overrides config)
        #[arg(long)]
        focus_min: Option<u64>,
        /// Break phase length in minutes (overrides config)
        #[arg(long)]
        break_min: Option<u64>,
        /// Stop after this many completed focus sessions
        #[arg(long, default_value = "1")]
        sessions: u32,
        /// Length of one simulated second in milliseconds
        #[arg(long, default_value = "1000")]
        tick_ms: u64,
        /// Also print the per-second state snapshots
        #[arg(long)]
        verbose: bool,
    },
    /// Print the initial timer state as JSON
    Show {
        /// Focus phase length in minutes (overrides config)
        #[arg(long)]
        focus_min: Option<u64>,
        /// Break phase length in minutes (overrides config)
        #[arg(long)]
        break_min: Option<u64>,
    },
}

fn durations(focus_min: Option<u64>, break_min: Option<u64>) -> Durations {
    let configured = Config::load().durations();
    Durations {
        focus_min: focus_min.unwrap_or(configured.focus_min),
        break_min: break_min.unwrap_or(configured.break_min),
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Show {
            focus_min,
            break_min,
        } => {
            let engine = TimerEngine::new(durations(focus_min, break_min));
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
        TimerAction::Run {
            focus_min,
            break_min,
            sessions,
            tick_ms,
            verbose,
        } => {
            if sessions == 0 {
                return Err("--sessions must be at least 1".into());
            }
            if tick_ms == 0 {
                return Err("--tick-ms must be at least 1".into());
            }
            let engine = TimerEngine::new(durations(focus_min, break_min));
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(run_countdown(
                engine,
                sessions,
                Duration::from_millis(tick_ms),
                verbose,
            ))?;
        }
    }
    Ok(())
}

/// Drives the engine until `sessions` focus phases have completed,
/// auto-starting the next phase after each completion.
async fn run_countdown(
    engine: TimerEngine,
    sessions: u32,
    period: Duration,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (handle, mut events) = TimerDriver::spawn_with_period(engine, period);
    handle.start()?;

    while let Some(event) = events.recv().await {
        match &event {
            Event::StateSnapshot { .. } => {
                if verbose {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            Event::SessionCompleted { completed_focus, .. } => {
                println!("{}", serde_json::to_string(&event)?);
                if *completed_focus >= sessions {
                    break;
                }
                handle.start()?;
            }
            _ => println!("{}", serde_json::to_string(&event)?),
        }
    }
    Ok(())
}
