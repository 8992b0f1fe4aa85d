//! H/V random logic: the latch stage behind the select decoders.
//!
//! All select outputs are sampled on nPCLK. On PCLK three of them are folded
//! into output latches, and the clip flags are read combinationally from those
//! latches and the mask bits. A decode therefore reaches the flags on the first
//! PCLK after the dot it recognized.

#[cfg(feature = "savestate-serde")]
use serde::{Deserialize, Serialize};

use crate::logic::{Signal, not};
use crate::ppu::PpuContext;
use crate::ppu::select::{AUX, FIRST_TILE, H_SELECT_COUNT, LEFT_HALF, ZERO_HPOS};

#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HvLatches {
    pub input: [Signal; H_SELECT_COUNT],
    /// Only cells 2, 3 and 5 are driven.
    pub output: [Signal; H_SELECT_COUNT],
}

pub(crate) fn step(ppu: &mut PpuContext) {
    let hv = &mut ppu.hv;
    if ppu.ctrl.n_pclk == 1 {
        hv.input = ppu.bus.hsel;
    }
    if ppu.ctrl.pclk == 1 {
        hv.output[AUX] = not(hv.input[AUX]);
        hv.output[FIRST_TILE] = hv.input[LEFT_HALF] & not(hv.input[FIRST_TILE]);
        hv.output[ZERO_HPOS] = not(hv.input[ZERO_HPOS]);
    }

    ppu.ctrl.aux = not(hv.output[AUX]);
    ppu.ctrl.clip_o = not(hv.output[FIRST_TILE]) & not(ppu.ctrl.obclip);
    ppu.ctrl.clip_b = not(hv.output[FIRST_TILE]) & not(ppu.ctrl.bgclip);
    ppu.ctrl.zhpos = not(hv.output[ZERO_HPOS]);
}
