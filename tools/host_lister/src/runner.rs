use std::{fmt, io::Write as _, thread, time::Duration};

use log::info;
use winc_imager::{App, State, Volume};

/// Forwards console text to stdout.
pub struct StdoutConsole;

impl fmt::Write for StdoutConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut out = std::io::stdout().lock();
        out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        out.flush().map_err(|_| fmt::Error)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    pub max_ticks: Option<u64>,
    pub tick_delay: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub state: State,
}

/// Drives the superloop until the machine parks or the tick budget runs out.
pub fn run<V, W>(
    app: &mut App<V>,
    volume: &mut V,
    console: &mut W,
    options: RunOptions,
) -> RunSummary
where
    V: Volume,
    W: fmt::Write,
{
    app.start(console);
    let mut ticks = 0u64;
    while !app.state().is_terminal() {
        if options.max_ticks.is_some_and(|max| ticks >= max) {
            info!(
                "host: tick budget exhausted ticks={} state={}",
                ticks,
                app.state()
            );
            break;
        }
        app.tick(volume, console);
        ticks += 1;
        if !options.tick_delay.is_zero() {
            thread::sleep(options.tick_delay);
        }
    }
    RunSummary {
        ticks,
        state: app.state(),
    }
}
