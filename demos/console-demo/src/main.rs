//! Junction Console Demo
//!
//! Runs the adaptive signal controller against four vehicle counts and prints
//! the light board once per simulated second.
//!
//! Usage: console-demo [N E S W] [--cycles N] [--realtime]
//!
//! Without counts on the command line, they are read from stdin.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use junction_core::{AbortReason, Acquisition, Direction};
use junction_runtime::{init_tracing, LogConfig, Session, SessionConfig};
use junction_timing::TickClock;

struct Options {
    counts: Vec<i64>,
    cycles: u64,
    realtime: bool,
}

fn parse_args() -> Result<Options, Box<dyn std::error::Error>> {
    let mut counts = Vec::new();
    let mut cycles = 1;
    let mut realtime = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--realtime" => realtime = true,
            "--cycles" => {
                let value = args.next().ok_or("--cycles needs a value")?;
                cycles = value.parse::<u64>()?;
            }
            other => counts.push(other.parse::<i64>()?),
        }
    }

    Ok(Options {
        counts,
        cycles,
        realtime,
    })
}

/// Ask for one count per approach. An empty line cancels.
fn prompt_counts() -> io::Result<Acquisition> {
    let mut counts = Vec::with_capacity(4);

    for direction in Direction::ALL {
        print!("Vehicles waiting on the {} approach: ", direction);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(Acquisition::Aborted(AbortReason::Cancelled));
        }
        match line.parse::<i64>() {
            Ok(n) => counts.push(n),
            Err(_) => return Ok(Acquisition::Aborted(AbortReason::CaptureFailed { direction })),
        }
    }

    Acquisition::from_raw(&counts).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&LogConfig::default())?;

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║           Junction - Adaptive Signal Controller            ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    let options = parse_args()?;
    let acquisition = if options.counts.is_empty() {
        prompt_counts()?
    } else {
        Acquisition::from_raw(&options.counts)?
    };

    let config = SessionConfig::default();
    let mut session = match Session::start(acquisition, config) {
        Ok(session) => session,
        Err(e) => {
            println!("No valid input provided: {}", e);
            return Ok(());
        }
    };

    println!("Green times:");
    for (direction, seconds) in session.durations().iter() {
        println!("  {:<5} {:>5.1}s", direction.name(), seconds);
    }
    println!();

    if options.realtime {
        let mut clock = session.config().live_clock();
        run(&mut session, &mut clock, options.cycles, true);
    } else {
        let mut clock = session.config().fixed_clock();
        run(&mut session, &mut clock, options.cycles, false);
    }

    let stats = session.stats();
    println!();
    println!(
        "Done: {} ticks, {} phase changes, {:.1}s simulated",
        stats.ticks, stats.phase_changes, stats.elapsed
    );
    Ok(())
}

fn run<C: TickClock>(session: &mut Session, clock: &mut C, cycles: u64, realtime: bool) {
    let frame = Duration::from_secs_f64(1.0 / session.config().tick_rate);
    let mut next_print = 0.0;

    while session.query().cycles_completed < cycles {
        let started = Instant::now();
        session.tick(clock);

        if clock.elapsed() >= next_print {
            println!("{}", session.view());
            next_print += 1.0;
        }

        if realtime {
            if let Some(rest) = frame.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    tracing::info!(cycles, "demo finished");
}
