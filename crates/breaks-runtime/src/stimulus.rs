//! Pad stimulus recorded as a script of held pad states.

pub mod script;

use bitflags::bitflags;
use breaks_core::Mask;

pub use script::Script;

use crate::driver::Pads;

bitflags! {
    /// Pads held high by one script record, in field order `N Y S O B`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct StimulusFlags: u8 {
        /// nRES.
        const N_RES = 1 << 0;
        /// READY.
        const READY = 1 << 1;
        const SYNC = 1 << 2;
        /// OBCLIP, mask bit 2.
        const OBCLIP = 1 << 3;
        /// BGCLIP, mask bit 1.
        const BGCLIP = 1 << 4;
    }
}

/// Letters of the flags field, in column order.
pub(crate) const FLAG_COLUMNS: [(char, StimulusFlags); 5] = [
    ('N', StimulusFlags::N_RES),
    ('Y', StimulusFlags::READY),
    ('S', StimulusFlags::SYNC),
    ('O', StimulusFlags::OBCLIP),
    ('B', StimulusFlags::BGCLIP),
];

/// Pad state held for `count` master half-cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StimulusRecord {
    pub flags: StimulusFlags,
    pub count: u32,
}

impl StimulusRecord {
    pub fn pads(&self) -> Pads {
        let level = |flag| u8::from(self.flags.contains(flag));
        Pads {
            n_res: level(StimulusFlags::N_RES),
            rdy: level(StimulusFlags::READY),
            sync: level(StimulusFlags::SYNC),
        }
    }

    /// `base` with its left-column bits replaced by this record's clip flags.
    pub fn mask(&self, base: Mask) -> Mask {
        let mut mask = base - (Mask::SHOW_SPRITES_LEFT | Mask::SHOW_BACKGROUND_LEFT);
        mask.set(
            Mask::SHOW_SPRITES_LEFT,
            self.flags.contains(StimulusFlags::OBCLIP),
        );
        mask.set(
            Mask::SHOW_BACKGROUND_LEFT,
            self.flags.contains(StimulusFlags::BGCLIP),
        );
        mask
    }
}
