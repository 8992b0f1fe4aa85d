use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Core(#[from] breaks_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `line` is 1-based.
    #[error("invalid stimulus script at line {line}: {reason}")]
    InvalidScript { line: usize, reason: String },

    #[error("unsupported stimulus script version: {0}")]
    UnsupportedScriptVersion(u32),

    #[error("snapshot image could not be decoded: {0}")]
    Snapshot(#[from] postcard::Error),

    #[error("replay logs differ in length ({left} vs {right} steps)")]
    ReplayLengthMismatch { left: usize, right: usize },

    #[error("snapshot image changed size from {expected} to {actual} bytes")]
    ImageSizeChanged { expected: usize, actual: usize },

    #[error("replay delta is corrupt: {0}")]
    CorruptReplay(#[from] lz4_flex::block::DecompressError),

    #[error("invalid value for {var}: {value:?}")]
    InvalidConfig { var: &'static str, value: String },
}
