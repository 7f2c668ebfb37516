use std::{
    fs::{self, ReadDir},
    io,
    path::PathBuf,
};

use log::debug;
use winc_imager::volume::{fill_truncated, FileStatus, FsError, MountRequest, Volume};

/// Serves a host directory as the card. The configured mount point maps to
/// `root`.
pub struct HostVolume {
    root: PathBuf,
    mount_point: Option<String>,
}

impl HostVolume {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mount_point: None,
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FsError> {
        let mount_point = self.mount_point.as_deref().ok_or(FsError::NotEnabled)?;
        let rest = path
            .strip_prefix(mount_point)
            .ok_or(FsError::InvalidDrive)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return Err(FsError::NoPath);
        }
        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            Ok(self.root.clone())
        } else {
            Ok(self.root.join(rest))
        }
    }
}

fn map_io(err: &io::Error) -> FsError {
    match err.kind() {
        io::ErrorKind::NotFound => FsError::NoPath,
        io::ErrorKind::PermissionDenied => FsError::Denied,
        _ => FsError::DiskError,
    }
}

impl Volume for HostVolume {
    type Dir = ReadDir;

    fn mount(&mut self, request: &MountRequest<'_>) -> Result<(), FsError> {
        if !self.root.is_dir() {
            return Err(FsError::NotReady);
        }
        self.mount_point = Some(request.mount_point.to_owned());
        Ok(())
    }

    fn set_active(&mut self, mount_point: &str) -> Result<(), FsError> {
        match self.mount_point.as_deref() {
            Some(mounted) if mounted == mount_point => Ok(()),
            _ => Err(FsError::InvalidDrive),
        }
    }

    fn open_dir(&mut self, path: &str) -> Result<Self::Dir, FsError> {
        let dir = self.resolve(path)?;
        debug!("host: open_dir path={} host={}", path, dir.display());
        fs::read_dir(&dir).map_err(|err| map_io(&err))
    }

    fn read_dir(
        &mut self,
        dir: &mut Self::Dir,
        status: &mut FileStatus<'_>,
    ) -> Result<(), FsError> {
        let Some(entry) = dir.next() else {
            return Ok(());
        };
        let entry = entry.map_err(|err| map_io(&err))?;
        let metadata = entry.metadata().map_err(|err| map_io(&err))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        fill_truncated(&mut *status.long_name, &name);
        fill_truncated(&mut status.short_name, &name);
        status.size = u32::try_from(metadata.len()).unwrap_or(u32::MAX);
        Ok(())
    }

    fn close_dir(&mut self, dir: Self::Dir) -> Result<(), FsError> {
        drop(dir);
        Ok(())
    }
}
