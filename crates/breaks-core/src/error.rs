use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// A pad was driven with something other than 0 or 1.
    InvalidSignal { pad: &'static str, value: u8 },
    /// Snapshot serialization failed.
    #[cfg(feature = "savestate-postcard")]
    Encode(postcard::Error),
    /// Snapshot bytes could not be decoded back into a context.
    #[cfg(feature = "savestate-postcard")]
    Decode(postcard::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignal { pad, value } => {
                write!(f, "pad {pad} driven with {value}, expected 0 or 1")
            }
            #[cfg(feature = "savestate-postcard")]
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            #[cfg(feature = "savestate-postcard")]
            Self::Decode(err) => write!(f, "failed to decode snapshot: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "savestate-postcard")]
            Self::Encode(err) | Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}
