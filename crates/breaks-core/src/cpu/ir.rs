//! Instruction register.

use crate::cpu::{CpuContext, IR_BITS};
use crate::logic::{bit, not};

/// Loads the predecode bus into the instruction register on PHI1 while
/// `fetch` is asserted. `clear_ir` forces zeros (a BRK opcode) instead.
pub(crate) fn latch(cpu: &mut CpuContext) {
    if cpu.ctrl.phi1 == 1 && bit(cpu.ctrl.fetch) == 1 {
        let keep = not(cpu.ctrl.clear_ir);
        for b in 0..IR_BITS {
            cpu.ir[b] = bit(cpu.pd[b]) & keep;
        }
    }
}
