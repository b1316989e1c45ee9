//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use papertape::PageSize;

/// Verbosity accepted by `--log-level`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for tracing::Level {
    fn from(value: LogLevelArg) -> tracing::Level {
        match value {
            LogLevelArg::Error => tracing::Level::ERROR,
            LogLevelArg::Warn => tracing::Level::WARN,
            LogLevelArg::Info => tracing::Level::INFO,
            LogLevelArg::Debug => tracing::Level::DEBUG,
            LogLevelArg::Trace => tracing::Level::TRACE,
        }
    }
}

/// Sheet sizes the renderer lays tape out on.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PageSizeArg {
    Tape,
    A4,
    Letter,
    Legal,
}

impl From<PageSizeArg> for PageSize {
    fn from(value: PageSizeArg) -> PageSize {
        match value {
            PageSizeArg::Tape => PageSize::Tape,
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
        }
    }
}

/// Characters used by `papertape font` to draw holes.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum HoleStyleArg {
    #[value(name = "ascii-o")]
    AsciiO,
    #[value(name = "ascii-01")]
    Ascii01,
}

impl HoleStyleArg {
    /// Mark for a punched and an unpunched track.
    pub fn marks(self) -> (char, char) {
        match self {
            HoleStyleArg::AsciiO => ('o', ' '),
            HoleStyleArg::Ascii01 => ('1', '0'),
        }
    }
}
