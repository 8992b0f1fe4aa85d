//! Save/load surface for the chip contexts.
//!
//! Contexts are flat `Copy` aggregates, so a snapshot is the context itself
//! plus a little metadata. With `savestate-postcard` the same aggregates can be
//! turned into a byte image whose length depends only on the type, which is
//! what replay comparison diffs.

pub mod cpu;
pub mod ppu;

/// Metadata attached to every snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMeta {
    /// Version of the snapshot payload.
    pub format_version: u32,
    /// Master half-cycle count when the snapshot was taken.
    pub tick: u64,
}

impl Default for SnapshotMeta {
    fn default() -> Self {
        Self {
            format_version: 1,
            tick: 0,
        }
    }
}

impl SnapshotMeta {
    pub fn at(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }
}

/// Metadata bundled with a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T, M = SnapshotMeta> {
    pub meta: M,
    pub data: T,
}

pub trait SaveState {
    type Full;
    type Error;
    type Meta: Clone;

    /// Bumped whenever the context layout changes.
    const FORMAT_VERSION: u32 = 1;

    fn save_full(&self, meta: Self::Meta) -> Result<Snapshot<Self::Full, Self::Meta>, Self::Error>;

    fn load_full(&mut self, snapshot: &Snapshot<Self::Full, Self::Meta>)
    -> Result<(), Self::Error>;
}

/// Serializes a context (or a tuple of contexts) with postcard.
#[cfg(feature = "savestate-postcard")]
pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, crate::Error> {
    postcard::to_stdvec(value).map_err(crate::Error::Encode)
}

#[cfg(feature = "savestate-postcard")]
pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, crate::Error> {
    postcard::from_bytes(bytes).map_err(crate::Error::Decode)
}
