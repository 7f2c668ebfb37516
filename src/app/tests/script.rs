use std::collections::VecDeque;

use crate::volume::{fill_truncated, FileStatus, FsError, MountRequest, Volume};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Op {
    Mount,
    SetActive(String),
    Open(String),
    Read,
    Close(u32),
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Entry {
    pub(super) short: &'static str,
    pub(super) long: &'static str,
    pub(super) size: u32,
}

pub(super) const fn entry(short: &'static str, long: &'static str, size: u32) -> Entry {
    Entry { short, long, size }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) struct ScriptDir(pub(super) u32);

/// In-memory card with a scripted outcome for every driver call and a
/// journal of what the machine asked for.
pub(super) struct ScriptedVolume {
    mount_failures: u32,
    set_active_error: Option<FsError>,
    open_error: Option<FsError>,
    read_error_at: Option<(usize, FsError)>,
    close_error: Option<FsError>,
    entries: VecDeque<Entry>,
    reads: usize,
    next_handle: u32,
    pub(super) journal: Vec<Op>,
}

impl ScriptedVolume {
    pub(super) fn with_entries(entries: &[Entry]) -> Self {
        Self {
            mount_failures: 0,
            set_active_error: None,
            open_error: None,
            read_error_at: None,
            close_error: None,
            entries: entries.iter().copied().collect(),
            reads: 0,
            next_handle: 7,
            journal: Vec::new(),
        }
    }

    pub(super) fn empty() -> Self {
        Self::with_entries(&[])
    }

    pub(super) fn failing_mounts(mut self, count: u32) -> Self {
        self.mount_failures = count;
        self
    }

    pub(super) fn failing_set_active(mut self, err: FsError) -> Self {
        self.set_active_error = Some(err);
        self
    }

    pub(super) fn failing_open(mut self, err: FsError) -> Self {
        self.open_error = Some(err);
        self
    }

    /// Fails the read with zero-based index `index`.
    pub(super) fn failing_read_at(mut self, index: usize, err: FsError) -> Self {
        self.read_error_at = Some((index, err));
        self
    }

    pub(super) fn failing_close(mut self, err: FsError) -> Self {
        self.close_error = Some(err);
        self
    }

    pub(super) fn ops_after_mount(&self) -> impl Iterator<Item = &Op> {
        self.journal.iter().filter(|op| !matches!(op, Op::Mount))
    }
}

impl Volume for ScriptedVolume {
    type Dir = ScriptDir;

    fn mount(&mut self, request: &MountRequest<'_>) -> Result<(), FsError> {
        self.journal.push(Op::Mount);
        assert!(!request.device.is_empty());
        if self.mount_failures > 0 {
            self.mount_failures -= 1;
            return Err(FsError::NotReady);
        }
        Ok(())
    }

    fn set_active(&mut self, mount_point: &str) -> Result<(), FsError> {
        self.journal.push(Op::SetActive(mount_point.to_owned()));
        self.set_active_error.map_or(Ok(()), Err)
    }

    fn open_dir(&mut self, path: &str) -> Result<Self::Dir, FsError> {
        self.journal.push(Op::Open(path.to_owned()));
        if let Some(err) = self.open_error {
            return Err(err);
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        Ok(ScriptDir(handle))
    }

    fn read_dir(
        &mut self,
        _dir: &mut Self::Dir,
        status: &mut FileStatus<'_>,
    ) -> Result<(), FsError> {
        self.journal.push(Op::Read);
        let index = self.reads;
        self.reads += 1;
        if let Some((at, err)) = self.read_error_at {
            if at == index {
                return Err(err);
            }
        }
        if let Some(entry) = self.entries.pop_front() {
            fill_truncated(&mut status.short_name, entry.short);
            fill_truncated(&mut *status.long_name, entry.long);
            status.size = entry.size;
        }
        Ok(())
    }

    fn close_dir(&mut self, dir: Self::Dir) -> Result<(), FsError> {
        self.journal.push(Op::Close(dir.0));
        self.close_error.map_or(Ok(()), Err)
    }
}
