//! 2C02 video timing network.
//!
//! One call to [`advance_video_timing`] evaluates a single half-cycle of the
//! master clock, in this order:
//!
//! reset -> clock distribution -> pixel clock -> H/V counters ->
//! H/V select decoders -> H/V logic latches
//!
//! Each stage only consumes what the earlier stages produced in the same call
//! (or what a latch or bus kept from a previous call). Nothing iterates to a fixed
//! point: feedback is resolved by that order alone.

#[cfg(feature = "savestate-serde")]
use serde::{Deserialize, Serialize};

use crate::logic::{Signal, bit, pack};
use crate::trace::{TraceSink, VideoEvent};

pub mod clock;
pub mod hv_counter;
pub mod hv_logic;
mod mask;
pub mod select;

pub use hv_counter::{COUNTER_BITS, CounterBank};
pub use hv_logic::HvLatches;
pub use mask::Mask;
pub use select::{H_SELECT, H_SELECT_COUNT, SelectFormula, V_SELECT, V_SELECT_COUNT};

/// A 9-signal counter bus, bit 0 first.
pub type Bus9 = [Signal; COUNTER_BITS];

/// External pads.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PpuPads {
    /// Master clock.
    pub clk: Signal,
    /// Active-low reset.
    pub n_res: Signal,
}

/// Derived control lines, chip configuration bits and the H/V logic outputs.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PpuCtrl {
    pub n_clk: Signal,
    /// Reset, `NOT(n_res)`. Stops the pixel clock and masks the H/V buses.
    pub res: Signal,
    /// Register clear from the reset flip-flop.
    pub rc: Signal,
    /// Clears the reset flip-flop.
    pub rescl: Signal,
    pub pclk: Signal,
    pub n_pclk: Signal,
    /// H counter clear, applied on the out phase.
    pub hc: Signal,
    /// V counter clear, applied on the out phase.
    pub vc: Signal,
    /// V counter carry-in, asserted on one H position per line.
    pub vin: Signal,
    /// Show sprites in the leftmost 8 pixels.
    pub obclip: Signal,
    /// Show background in the leftmost 8 pixels.
    pub bgclip: Signal,
    pub clip_o: Signal,
    pub clip_b: Signal,
    pub zhpos: Signal,
    /// Output derived from select latch 2. Its consumer is not traced yet.
    pub aux: Signal,
}

#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PpuLatches {
    pub ff_reset: Signal,
    /// Pixel clock divider chain.
    pub pclk: [Signal; 4],
}

/// Combinational buses, recomputed on every call.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PpuBuses {
    pub h: Bus9,
    pub v: Bus9,
    pub hsel: [Signal; H_SELECT_COUNT],
    pub vsel: [Signal; V_SELECT_COUNT],
}

/// State of one simulated PPU, owned by the caller.
///
/// A zeroed context is the power-up state; note that a zero `n_res` pad means
/// reset is asserted until the caller raises it.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PpuContext {
    pub pad: PpuPads,
    pub ctrl: PpuCtrl,
    pub latch: PpuLatches,
    pub h: CounterBank,
    pub v: CounterBank,
    pub bus: PpuBuses,
    pub hv: HvLatches,
}

impl PpuContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// H bus as a number. Diagnostics only.
    pub fn h_position(&self) -> u16 {
        pack(&self.bus.h) as u16
    }

    /// V bus as a number. Diagnostics only.
    pub fn v_position(&self) -> u16 {
        pack(&self.bus.v) as u16
    }

    /// Output of H-select formula `index`, `None` past the end of the table.
    pub fn hsel(&self, index: usize) -> Option<Signal> {
        self.bus.hsel.get(index).copied()
    }

    pub fn vsel(&self, index: usize) -> Option<Signal> {
        self.bus.vsel.get(index).copied()
    }

    /// Loads the clip configuration bits from a `$2001` value.
    pub fn write_mask(&mut self, mask: Mask) {
        self.ctrl.obclip = bit(u8::from(mask.contains(Mask::SHOW_SPRITES_LEFT)));
        self.ctrl.bgclip = bit(u8::from(mask.contains(Mask::SHOW_BACKGROUND_LEFT)));
    }
}

/// Advances clocks, counters and decoders by one master half-cycle.
///
/// The caller toggles `ppu.pad.clk` between calls and reads H, V and the clip
/// flags back from the context afterwards.
pub fn advance_video_timing(ppu: &mut PpuContext) {
    clock::reset(ppu);
    clock::distribute(ppu);
    clock::pixel_clock(ppu);
    hv_counter::step(ppu);
    select::decode(ppu);
    hv_logic::step(ppu);
}

/// Same as [`advance_video_timing`], reporting the result to `sink`.
pub fn advance_video_timing_traced(ppu: &mut PpuContext, sink: &mut dyn TraceSink) {
    advance_video_timing(ppu);
    sink.on_video_step(&VideoEvent::capture(ppu));
}
