//! Filesystem driver seam.
//!
//! The machine only ever talks to storage through [`Volume`]. Drivers do one
//! bounded operation per call; retrying a failed `mount` must be harmless.

use core::fmt;

use heapless::String;

use crate::config::{FilesystemKind, FILENAME_BUFFER_LEN};

/// `NAME.EXT` in 8.3 form.
pub const SHORT_NAME_LEN: usize = 12;

pub type FilenameBuffer = String<FILENAME_BUFFER_LEN>;
pub type ShortName = String<SHORT_NAME_LEN>;

/// Driver result codes. Numeric values follow the usual FAT driver result
/// codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FsError {
    DiskError,
    InternalError,
    NotReady,
    NoFile,
    NoPath,
    InvalidName,
    Denied,
    InvalidObject,
    InvalidDrive,
    NotEnabled,
    NoFilesystem,
    Timeout,
    TooManyOpenFiles,
    InvalidParameter,
}

impl FsError {
    pub const fn code(self) -> u8 {
        match self {
            Self::DiskError => 1,
            Self::InternalError => 2,
            Self::NotReady => 3,
            Self::NoFile => 4,
            Self::NoPath => 5,
            Self::InvalidName => 6,
            Self::Denied => 7,
            Self::InvalidObject => 9,
            Self::InvalidDrive => 11,
            Self::NotEnabled => 12,
            Self::NoFilesystem => 13,
            Self::Timeout => 15,
            Self::TooManyOpenFiles => 18,
            Self::InvalidParameter => 19,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DiskError => "disk_error",
            Self::InternalError => "internal_error",
            Self::NotReady => "not_ready",
            Self::NoFile => "no_file",
            Self::NoPath => "no_path",
            Self::InvalidName => "invalid_name",
            Self::Denied => "denied",
            Self::InvalidObject => "invalid_object",
            Self::InvalidDrive => "invalid_drive",
            Self::NotEnabled => "not_enabled",
            Self::NoFilesystem => "no_filesystem",
            Self::Timeout => "timeout",
            Self::TooManyOpenFiles => "too_many_open_files",
            Self::InvalidParameter => "invalid_parameter",
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountRequest<'a> {
    pub device: &'a str,
    pub mount_point: &'a str,
    pub filesystem: FilesystemKind,
    pub flags: u32,
}

/// One directory-read result. Both names empty on `Ok` marks the end of the
/// directory.
pub struct FileStatus<'a> {
    pub short_name: ShortName,
    pub long_name: &'a mut FilenameBuffer,
    pub size: u32,
}

impl<'a> FileStatus<'a> {
    /// Borrows `long_name` as scratch and clears it.
    pub fn new(long_name: &'a mut FilenameBuffer) -> Self {
        long_name.clear();
        Self {
            short_name: ShortName::new(),
            long_name,
            size: 0,
        }
    }

    pub fn is_end_of_directory(&self) -> bool {
        self.short_name.is_empty() && self.long_name.is_empty()
    }

    pub fn display_name(&self) -> &str {
        if self.long_name.is_empty() {
            self.short_name.as_str()
        } else {
            self.long_name.as_str()
        }
    }
}

pub trait Volume {
    type Dir;

    fn mount(&mut self, request: &MountRequest<'_>) -> Result<(), FsError>;
    fn set_active(&mut self, mount_point: &str) -> Result<(), FsError>;
    fn open_dir(&mut self, path: &str) -> Result<Self::Dir, FsError>;
    fn read_dir(&mut self, dir: &mut Self::Dir, status: &mut FileStatus<'_>)
        -> Result<(), FsError>;
    fn close_dir(&mut self, dir: Self::Dir) -> Result<(), FsError>;
}

/// Copies `src` into `dst`, dropping whatever does not fit. Never splits a
/// UTF-8 sequence.
pub fn fill_truncated<const N: usize>(dst: &mut String<N>, src: &str) -> bool {
    dst.clear();
    for ch in src.chars() {
        if dst.push(ch).is_err() {
            return false;
        }
    }
    true
}
