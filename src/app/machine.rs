use core::fmt::Write;

use log::{error, info};

use super::{state::State, store::AppContext, throttle::LogThrottle};
use crate::{
    config::{active_config, IdleBehavior, ListerConfig},
    console,
    volume::{FileStatus, FsError, MountRequest, Volume},
};

/// What the last tick did, for callers that want more than the log stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickActivity {
    Nothing,
    MountPending { retries: u32, err: FsError, logged: bool },
    Mounted { retries: u32, logged: bool },
    ActivateFailed(FsError),
    DirectoryOpened,
    OpenFailed(FsError),
    EntryListed { size: u32 },
    ReadFailed(FsError),
    ListingEnded,
    DirectoryClosed { close_error: Option<FsError> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickResult {
    pub before: State,
    pub after: State,
    pub activity: TickActivity,
}

impl TickResult {
    pub fn changed(self) -> bool {
        self.before != self.after
    }
}

/// Mounts the card, lists one directory, and parks in `Complete` or `Error`.
///
/// Call [`App::tick`] from the superloop forever. Each call does at most one
/// driver operation and never waits on the medium.
pub struct App<V: Volume> {
    ctx: AppContext<V::Dir>,
    config: &'static ListerConfig,
    throttle: LogThrottle,
}

impl<V: Volume> Default for App<V> {
    fn default() -> Self {
        Self::new(active_config())
    }
}

impl<V: Volume> App<V> {
    pub fn new(config: &'static ListerConfig) -> Self {
        Self {
            ctx: AppContext::new(),
            config,
            throttle: LogThrottle::new(config.mount_wait_log_interval),
        }
    }

    /// Prints the version banner. Call once before the first tick.
    pub fn start<W: Write>(&mut self, console: &mut W) {
        console::write_banner(console);
    }

    pub fn state(&self) -> State {
        self.ctx.state()
    }

    pub fn context(&self) -> &AppContext<V::Dir> {
        &self.ctx
    }

    #[cfg(test)]
    pub(super) fn context_mut(&mut self) -> &mut AppContext<V::Dir> {
        &mut self.ctx
    }

    pub fn tick<W: Write>(&mut self, volume: &mut V, console: &mut W) -> TickResult {
        let before = self.ctx.state();
        let (next, activity) = match before {
            State::Idle => (self.idle_target(), TickActivity::Nothing),
            State::AwaitFilesystem => self.await_filesystem(volume),
            State::OpeningDirectory => self.open_directory(volume, console),
            State::ReadingDirectory => self.read_directory(volume, console),
            State::ClosingDirectory => self.close_directory(volume),
            State::Complete | State::Error => (before, TickActivity::Nothing),
        };
        self.ctx.set_state(next);
        TickResult {
            before,
            after: self.ctx.state(),
            activity,
        }
    }

    fn idle_target(&self) -> State {
        match self.config.idle {
            IdleBehavior::Advance => State::AwaitFilesystem,
            IdleBehavior::Hold => State::Idle,
        }
    }

    fn await_filesystem(&mut self, volume: &mut V) -> (State, TickActivity) {
        let saturated = self.ctx.mount_retries() == u32::MAX;
        let retries = self.ctx.bump_mount_retries();
        let target = &self.config.volume;
        let request = MountRequest {
            device: target.device,
            mount_point: target.mount_point,
            filesystem: target.filesystem,
            flags: target.mount_flags,
        };
        let mounted = volume.mount(&request);

        // Counted per attempt, successful or not. A pinned counter would hit
        // the same residue every tick, so it stops logging instead.
        let logged = !saturated && self.throttle.should_log(retries);
        if logged {
            match mounted {
                Ok(()) => info!(
                    "app: filesystem ready device={} retries={}",
                    target.device, retries
                ),
                Err(err) => info!(
                    "app: awaiting filesystem device={} retries={} err={}",
                    target.device, retries, err
                ),
            }
        }

        if let Err(err) = mounted {
            return (
                State::AwaitFilesystem,
                TickActivity::MountPending {
                    retries,
                    err,
                    logged,
                },
            );
        }

        if let Err(err) = volume.set_active(target.mount_point) {
            error!(
                "app: set_active_failed mount_point={} err={}",
                target.mount_point, err
            );
            return (State::Error, TickActivity::ActivateFailed(err));
        }

        info!(
            "app: mounted device={} mount_point={} fs={} retries={}",
            target.device,
            target.mount_point,
            target.filesystem.label(),
            retries
        );
        (
            State::OpeningDirectory,
            TickActivity::Mounted { retries, logged },
        )
    }

    fn open_directory<W: Write>(
        &mut self,
        volume: &mut V,
        console: &mut W,
    ) -> (State, TickActivity) {
        let path = self.config.volume.list_path;
        match volume.open_dir(path) {
            Ok(dir) => {
                self.ctx.directory = Some(dir);
                console::write_column_header(console);
                (State::ReadingDirectory, TickActivity::DirectoryOpened)
            }
            Err(err) => {
                error!("app: dir_open_failed path={} err={}", path, err);
                (State::Error, TickActivity::OpenFailed(err))
            }
        }
    }

    fn read_directory<W: Write>(
        &mut self,
        volume: &mut V,
        console: &mut W,
    ) -> (State, TickActivity) {
        let ctx = &mut self.ctx;
        let Some(dir) = ctx.directory.as_mut() else {
            error!("app: dir_read_without_handle");
            return (
                State::Error,
                TickActivity::ReadFailed(FsError::InvalidObject),
            );
        };

        let mut status = FileStatus::new(&mut ctx.filename);
        if let Err(err) = volume.read_dir(dir, &mut status) {
            error!("app: dir_read_failed err={}", err);
            // Terminal from here: release the slot without touching the driver again.
            ctx.directory = None;
            return (State::Error, TickActivity::ReadFailed(err));
        }

        if status.is_end_of_directory() {
            info!("app: listing complete");
            return (State::ClosingDirectory, TickActivity::ListingEnded);
        }

        console::write_entry(
            console,
            status.size,
            status.display_name(),
            self.config.size_column_width,
        );
        (
            State::ReadingDirectory,
            TickActivity::EntryListed { size: status.size },
        )
    }

    fn close_directory(&mut self, volume: &mut V) -> (State, TickActivity) {
        let close_error = self
            .ctx
            .directory
            .take()
            .and_then(|dir| volume.close_dir(dir).err());
        if let Some(err) = close_error {
            error!("app: dir_close_failed err={}", err);
        }
        (
            State::Complete,
            TickActivity::DirectoryClosed { close_error },
        )
    }
}
