use core::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Idle,
    AwaitFilesystem,
    OpeningDirectory,
    ReadingDirectory,
    ClosingDirectory,
    Complete,
    Error,
}

impl State {
    pub const ALL: [Self; 7] = [
        Self::Idle,
        Self::AwaitFilesystem,
        Self::OpeningDirectory,
        Self::ReadingDirectory,
        Self::ClosingDirectory,
        Self::Complete,
        Self::Error,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AwaitFilesystem => "AwaitFilesystem",
            Self::OpeningDirectory => "OpeningDirectory",
            Self::ReadingDirectory => "ReadingDirectory",
            Self::ClosingDirectory => "ClosingDirectory",
            Self::Complete => "Complete",
            Self::Error => "Error",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
