#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod config;
pub mod console;
pub mod volume;

pub use app::{App, State, TickActivity, TickResult};
pub use volume::{FileStatus, FsError, MountRequest, Volume};
