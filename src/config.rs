#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilesystemKind {
    Fat,
}

impl FilesystemKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fat => "fat",
        }
    }
}

/// What `Idle` requests on each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleBehavior {
    /// Leave `Idle` on the first tick and start waiting for the card.
    Advance,
    /// Stay parked in `Idle`.
    Hold,
}

#[derive(Clone, Copy, Debug)]
pub struct VolumeConfig {
    pub device: &'static str,
    pub mount_point: &'static str,
    pub list_path: &'static str,
    pub filesystem: FilesystemKind,
    pub mount_flags: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct ListerConfig {
    pub volume: VolumeConfig,
    pub idle: IdleBehavior,
    pub mount_wait_log_interval: u32,
    pub size_column_width: u8,
}

include!(concat!(env!("OUT_DIR"), "/lister_config.rs"));

pub fn active_config() -> &'static ListerConfig {
    &LISTER_CONFIG
}

pub const APP_NAME: &str = "winc-imager";
pub const APP_URL: &str = "https://github.com/rdpoor/winc-imager";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
