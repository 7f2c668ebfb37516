use core::fmt::Write;

use embedded_sdmmc::{
    BlockDevice, Error as SdmmcError, RawDirectory, RawVolume, ShortFileName, TimeSource,
    Timestamp, VolumeIdx, VolumeManager,
};
use log::debug;
use winc_imager::volume::{FileStatus, FsError, MountRequest, Volume};

/// The lister never writes, so directory timestamps are irrelevant.
pub(crate) struct FixedClock;

impl TimeSource for FixedClock {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 0,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// Open directory plus how many entries have been handed out so far.
pub(crate) struct SdDir {
    raw: RawDirectory,
    cursor: usize,
}

/// FAT volume 0 on the SPI card, mounted under the configured mount point.
pub(crate) struct SdVolume<D: BlockDevice, T: TimeSource> {
    manager: VolumeManager<D, T>,
    volume: Option<RawVolume>,
    mount_point: heapless::String<32>,
}

impl<D: BlockDevice, T: TimeSource> SdVolume<D, T> {
    pub(crate) fn new(manager: VolumeManager<D, T>) -> Self {
        Self {
            manager,
            volume: None,
            mount_point: heapless::String::new(),
        }
    }

    fn relative<'p>(&self, path: &'p str) -> Result<&'p str, FsError> {
        let rest = path
            .strip_prefix(self.mount_point.as_str())
            .ok_or(FsError::InvalidDrive)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return Err(FsError::NoPath);
        }
        Ok(rest.trim_matches('/'))
    }
}

fn map_error<E: core::fmt::Debug>(err: &SdmmcError<E>) -> FsError {
    match err {
        SdmmcError::DeviceError(_) => FsError::DiskError,
        SdmmcError::FormatError(_) | SdmmcError::NoSuchVolume => FsError::NoFilesystem,
        SdmmcError::FilenameError(_) => FsError::InvalidName,
        SdmmcError::NotFound => FsError::NoPath,
        SdmmcError::BadHandle => FsError::InvalidObject,
        SdmmcError::OpenedFileAsDir => FsError::NoPath,
        SdmmcError::TooManyOpenVolumes
        | SdmmcError::TooManyOpenDirs
        | SdmmcError::TooManyOpenFiles => FsError::TooManyOpenFiles,
        _ => FsError::InternalError,
    }
}

impl<D: BlockDevice, T: TimeSource> Volume for SdVolume<D, T> {
    type Dir = SdDir;

    fn mount(&mut self, request: &MountRequest<'_>) -> Result<(), FsError> {
        if self.volume.is_none() {
            let raw = self
                .manager
                .open_raw_volume(VolumeIdx(0))
                .map_err(|err| {
                    debug!("sd: open_volume failed err={:?}", err);
                    match err {
                        SdmmcError::DeviceError(_) => FsError::NotReady,
                        other => map_error(&other),
                    }
                })?;
            self.volume = Some(raw);
        }
        self.mount_point.clear();
        self.mount_point
            .push_str(request.mount_point)
            .map_err(|_| FsError::InvalidParameter)?;
        Ok(())
    }

    fn set_active(&mut self, mount_point: &str) -> Result<(), FsError> {
        if self.volume.is_some() && self.mount_point.as_str() == mount_point {
            Ok(())
        } else {
            Err(FsError::InvalidDrive)
        }
    }

    fn open_dir(&mut self, path: &str) -> Result<Self::Dir, FsError> {
        let volume = self.volume.ok_or(FsError::NotEnabled)?;
        let rest = self.relative(path)?;
        let mut dir = self
            .manager
            .open_root_dir(volume)
            .map_err(|err| map_error(&err))?;
        for component in rest.split('/').filter(|part| !part.is_empty()) {
            let child = self.manager.open_dir(dir, component);
            let _ = self.manager.close_dir(dir);
            dir = child.map_err(|err| map_error(&err))?;
        }
        Ok(SdDir { raw: dir, cursor: 0 })
    }

    // `iterate_dir` has no early exit, so every call scans the whole
    // directory to reach entry `cursor`. One tick is O(N) block reads and a
    // full listing is O(N^2).
    fn read_dir(
        &mut self,
        dir: &mut Self::Dir,
        status: &mut FileStatus<'_>,
    ) -> Result<(), FsError> {
        let wanted = dir.cursor;
        let mut seen = 0usize;
        let mut found: Option<(ShortFileName, u32)> = None;
        self.manager
            .iterate_dir(dir.raw, |entry| {
                if entry.attributes.is_volume()
                    || entry.name == ShortFileName::this_dir()
                    || entry.name == ShortFileName::parent_dir()
                {
                    return;
                }
                if seen == wanted && found.is_none() {
                    found = Some((entry.name.clone(), entry.size));
                }
                seen += 1;
            })
            .map_err(|err| map_error(&err))?;

        if let Some((name, size)) = found {
            let _ = write!(status.short_name, "{}", name);
            status.size = size;
            dir.cursor += 1;
        }
        Ok(())
    }

    fn close_dir(&mut self, dir: Self::Dir) -> Result<(), FsError> {
        self.manager
            .close_dir(dir.raw)
            .map_err(|err| map_error(&err))
    }
}
