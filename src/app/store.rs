use log::info;

use super::state::State;
use crate::volume::FilenameBuffer;

/// Everything the machine remembers between ticks. Fixed size; the directory
/// handle type is whatever the volume driver hands out.
pub struct AppContext<D> {
    pub(super) state: State,
    pub(super) mount_retries: u32,
    pub(super) directory: Option<D>,
    pub(super) filename: FilenameBuffer,
}

impl<D> AppContext<D> {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            mount_retries: 0,
            directory: None,
            filename: FilenameBuffer::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn mount_retries(&self) -> u32 {
        self.mount_retries
    }

    pub fn has_open_directory(&self) -> bool {
        self.directory.is_some()
    }

    /// Commits `next` and logs `<old> => <new>`. Requests for the current
    /// state are dropped silently. Returns whether the state changed.
    pub fn set_state(&mut self, next: State) -> bool {
        if self.state == next {
            return false;
        }
        info!("{} => {}", self.state.name(), next.name());
        self.state = next;
        true
    }

    pub(super) fn bump_mount_retries(&mut self) -> u32 {
        self.mount_retries = self.mount_retries.saturating_add(1);
        self.mount_retries
    }
}

impl<D> Default for AppContext<D> {
    fn default() -> Self {
        Self::new()
    }
}
