//! 6502 timing front end.
//!
//! Only the parts of the processor that are driven purely by clock phases are
//! modelled here: the PHI1/PHI2 phase split, the T-state sequencer and the
//! instruction register latch. Opcode decode and execution are out of scope.

#[cfg(feature = "savestate-serde")]
use serde::{Deserialize, Serialize};

use crate::logic::{Signal, pack};
use crate::trace::{TStateEvent, TraceSink};

pub mod ir;
mod phase;
pub mod t_state;

pub use t_state::{JOHNSON_SEQUENCE, RESET_CODE, SEED_CODE, TStateBank};

/// Width of the predecode bus and the instruction register.
pub const IR_BITS: usize = 8;

/// External pads sampled by the sequencer.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CpuPads {
    /// Master phase input. PHI1 and PHI2 are derived from it.
    pub phi0: Signal,
    /// Active-low reset.
    pub n_res: Signal,
    /// READY. Low stalls the sequencer without losing phase alignment.
    pub rdy: Signal,
    /// SYNC, marking the opcode fetch cycle.
    pub sync: Signal,
}

/// Derived clock phases and internal control lines.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CpuCtrl {
    pub phi1: Signal,
    pub phi2: Signal,
    /// Synchronous sequencer reset, `NOT(n_res)`.
    pub t_res: Signal,
    /// Load the instruction register from the predecode bus during PHI1.
    pub fetch: Signal,
    /// Forces zeros into the instruction register when it is loaded.
    pub clear_ir: Signal,
}

/// State of one simulated CPU, owned by the caller.
///
/// A zeroed context is the power-up state. The step functions never keep a
/// reference to it between calls.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CpuContext {
    pub pad: CpuPads,
    pub ctrl: CpuCtrl,
    pub t: TStateBank,
    /// Predecode bus feeding the instruction register.
    pub pd: [Signal; IR_BITS],
    pub ir: [Signal; IR_BITS],
}

impl CpuContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current T-state code, bit `i` taken from cell `i`'s out half.
    pub fn t_state(&self) -> u8 {
        self.t.code()
    }

    /// Instruction register contents as a byte.
    pub fn ir_value(&self) -> u8 {
        pack(&self.ir) as u8
    }

    /// Drives the predecode bus from a byte, bit 0 first.
    pub fn set_predecode(&mut self, value: u8) {
        for (b, cell) in self.pd.iter_mut().enumerate() {
            *cell = (value >> b) & 1;
        }
    }
}

/// Advances the T-state sequencer by one half-cycle.
///
/// SYNC, READY and reset are read from `cpu.pad`; the caller toggles
/// `cpu.pad.phi0` between calls. Returns the T-state code (0..=15).
pub fn advance_t_state(cpu: &mut CpuContext) -> u8 {
    phase::derive(cpu);
    t_state::step(cpu)
}

/// Same as [`advance_t_state`], reporting the new state to `sink`.
pub fn advance_t_state_traced(cpu: &mut CpuContext, sink: &mut dyn TraceSink) -> u8 {
    let code = advance_t_state(cpu);
    sink.on_t_state(&TStateEvent::capture(cpu));
    code
}

/// Runs the instruction register latch for the current half-cycle.
pub fn latch_instruction_register(cpu: &mut CpuContext) {
    phase::derive(cpu);
    ir::latch(cpu);
}
