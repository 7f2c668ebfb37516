mod host_volume;
mod logging;
mod runner;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use clap::Parser;
use host_volume::HostVolume;
use log::LevelFilter;
use logging::Logger;
use runner::{RunOptions, StdoutConsole};
use winc_imager::{config::active_config, App, State};

#[derive(Debug, Parser)]
#[command(name = "host_lister")]
#[command(about = "Run the card lister superloop against a host directory")]
struct Cli {
    /// Host directory served as the card's mount point.
    #[arg(long)]
    volume: PathBuf,
    /// Stop after this many ticks even if the machine has not parked.
    #[arg(long = "max-ticks")]
    max_ticks: Option<u64>,
    #[arg(long = "tick-delay-us", default_value_t = 0)]
    tick_delay_us: u64,
    /// Append log records as JSON lines to this file.
    #[arg(long = "log-json")]
    log_json: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    Logger::new(cli.level, cli.log_json)?.install()?;

    let config = active_config();
    log::info!(
        "host: serving {} as {} list_path={}",
        cli.volume.display(),
        config.volume.mount_point,
        config.volume.list_path
    );

    let mut app = App::<HostVolume>::new(config);
    let mut volume = HostVolume::new(cli.volume);
    let summary = runner::run(
        &mut app,
        &mut volume,
        &mut StdoutConsole,
        RunOptions {
            max_ticks: cli.max_ticks,
            tick_delay: Duration::from_micros(cli.tick_delay_us),
        },
    );
    log::logger().flush();

    match summary.state {
        State::Complete => Ok(()),
        State::Error => bail!("listing failed after {} ticks", summary.ticks),
        state => bail!(
            "machine still in {} after {} ticks",
            state,
            summary.ticks
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_flag_parses_into_filter() {
        let cli = Cli::try_parse_from(["host_lister", "--volume", "/tmp/card", "--level", "debug"])
            .expect("cli should parse");
        assert_eq!(cli.level, LevelFilter::Debug);
        assert_eq!(cli.volume, PathBuf::from("/tmp/card"));
        assert_eq!(cli.max_ticks, None);
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = Cli::try_parse_from(["host_lister", "--volume", "/tmp/card", "--level", "loud"])
            .expect_err("bad level");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
