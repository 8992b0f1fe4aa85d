use crate::cpu::CpuContext;
use crate::logic::{bit, not};

/// Splits the PHI0 pad into the two internal phases.
///
/// PHI1 follows the inverted pad and PHI2 the pad itself, so the two are
/// never asserted in the same half-cycle.
pub(crate) fn derive(cpu: &mut CpuContext) {
    cpu.ctrl.phi1 = not(cpu.pad.phi0);
    cpu.ctrl.phi2 = bit(cpu.pad.phi0);
}
