//! Per-step history of both chip contexts, for determinism checks.
//!
//! Every recorded step is the postcard image of `(CpuContext, PpuContext)`.
//! Images of one log all have the same length, so each step is stored as the
//! LZ4-compressed XOR against the previous image (the first one against all
//! zeros). A running CRC32 after every step lets two logs find the first step
//! where they differ without unpacking anything before it.

use breaks_core::{CpuContext, PpuContext};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};

use crate::error::RuntimeError;

/// First point where two logs disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Divergence {
    /// Index of the step, 0 for the first recorded step.
    pub step: usize,
    /// Offset of the first differing byte in that step's image.
    pub byte: usize,
}

#[derive(Clone, Default)]
pub struct ReplayLog {
    /// LZ4-compressed XOR diffs, one per step.
    deltas: Vec<Vec<u8>>,
    /// CRC32 over every image up to and including each step.
    digests: Vec<u32>,
    hasher: crc32fast::Hasher,
    /// Image of the latest step.
    current: Vec<u8>,
}

impl std::fmt::Debug for ReplayLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayLog")
            .field("steps", &self.deltas.len())
            .field("image_len", &self.current.len())
            .field("digest", &format_args!("{:#010x}", self.digest()))
            .finish()
    }
}

impl ReplayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Running digest after the last step, 0 when empty.
    pub fn digest(&self) -> u32 {
        self.digests.last().copied().unwrap_or(0)
    }

    pub fn record(&mut self, image: &[u8]) -> Result<(), RuntimeError> {
        if self.current.is_empty() {
            self.current = vec![0; image.len()];
        } else if self.current.len() != image.len() {
            return Err(RuntimeError::ImageSizeChanged {
                expected: self.current.len(),
                actual: image.len(),
            });
        }

        let diff: Vec<u8> = image
            .iter()
            .zip(&self.current)
            .map(|(cur, prev)| cur ^ prev)
            .collect();
        self.deltas.push(compress_prepend_size(&diff));
        self.current.copy_from_slice(image);

        self.hasher.update(image);
        self.digests.push(self.hasher.clone().finalize());
        Ok(())
    }

    /// Image of step `step`, rebuilt from the first delta forward.
    pub fn image_at(&self, step: usize) -> Result<Option<Vec<u8>>, RuntimeError> {
        if step >= self.deltas.len() {
            return Ok(None);
        }
        let mut image = vec![0; self.current.len()];
        for delta in &self.deltas[..=step] {
            let diff = decompress_size_prepended(delta)?;
            if diff.len() != image.len() {
                return Err(RuntimeError::ImageSizeChanged {
                    expected: image.len(),
                    actual: diff.len(),
                });
            }
            for (b, d) in image.iter_mut().zip(&diff) {
                *b ^= d;
            }
        }
        Ok(Some(image))
    }

    /// Contexts as they were after step `step`.
    pub fn state_at(&self, step: usize) -> Result<Option<(CpuContext, PpuContext)>, RuntimeError> {
        match self.image_at(step)? {
            Some(image) => Ok(Some(postcard::from_bytes(&image)?)),
            None => Ok(None),
        }
    }

    /// First step and byte where `self` and `other` differ.
    ///
    /// Logs of different length are an error: a shorter run says nothing
    /// about the steps it never took.
    pub fn first_divergence(&self, other: &ReplayLog) -> Result<Option<Divergence>, RuntimeError> {
        if self.len() != other.len() {
            return Err(RuntimeError::ReplayLengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        let Some(step) = self
            .digests
            .iter()
            .zip(&other.digests)
            .position(|(a, b)| a != b)
        else {
            return Ok(None);
        };

        let ours = self.image_at(step)?.unwrap_or_default();
        let theirs = other.image_at(step)?.unwrap_or_default();
        let byte = ours
            .iter()
            .zip(&theirs)
            .position(|(a, b)| a != b)
            .unwrap_or(ours.len().min(theirs.len()));
        tracing::info!(step, byte, "replay diverged");
        Ok(Some(Divergence { step, byte }))
    }

    /// Drops every step from `len` on. Recording resumes from the image of
    /// step `len - 1` and the digest chain continues from there.
    pub fn truncate(&mut self, len: usize) -> Result<(), RuntimeError> {
        if len >= self.deltas.len() {
            return Ok(());
        }
        if len == 0 {
            self.clear();
            return Ok(());
        }
        let image = self.image_at(len - 1)?.unwrap_or_default();
        self.deltas.truncate(len);
        self.digests.truncate(len);
        self.current = image;
        self.hasher = crc32fast::Hasher::new_with_initial(self.digest());
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
