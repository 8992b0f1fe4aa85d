//! H (dot) and V (line) counters.
//!
//! Each bank is nine master/slave cells. The out half loads on PCLK, the in
//! half on nPCLK. A cell whose carry is set re-latches its own output, so the
//! next PCLK inverts it; a cell without carry latches its complement and
//! holds. Each cell ANDs its output into the carry for the next one, except
//! cell 4, whose five-input gate looks at outputs 0..4 directly.

#[cfg(feature = "savestate-serde")]
use serde::{Deserialize, Serialize};

use crate::logic::{Signal, not};
use crate::ppu::{Bus9, PpuContext};

pub const COUNTER_BITS: usize = 9;

/// Cell holding the wide carry gate.
const GROUP_CARRY_CELL: usize = 4;

#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CounterBank {
    pub input: [Signal; COUNTER_BITS],
    pub output: [Signal; COUNTER_BITS],
}

/// Phase and clear lines shared by both banks for one half-cycle.
#[derive(Debug, Clone, Copy)]
struct CountPhase {
    pclk: Signal,
    n_pclk: Signal,
    res: Signal,
}

pub(crate) fn step(ppu: &mut PpuContext) {
    // Decoded from the H bus the previous call left behind, before the H bank
    // moves.
    ppu.ctrl.vin = v_carry_in(&ppu.bus.h);

    let phase = CountPhase {
        pclk: ppu.ctrl.pclk,
        n_pclk: ppu.ctrl.n_pclk,
        res: ppu.ctrl.res,
    };

    count(
        &mut ppu.h,
        &mut ppu.bus.h,
        phase,
        ppu.ctrl.hc,
        1,
        h_group_carry,
    );

    let vin = ppu.ctrl.vin;
    count(
        &mut ppu.v,
        &mut ppu.bus.v,
        phase,
        ppu.ctrl.vc,
        vin,
        |out: &Bus9| v_group_carry(out, vin),
    );
}

fn count(
    bank: &mut CounterBank,
    bus: &mut Bus9,
    phase: CountPhase,
    clear: Signal,
    carry_in: Signal,
    group_carry: impl Fn(&Bus9) -> Signal,
) {
    let mut carry = carry_in;
    for n in 0..COUNTER_BITS {
        if phase.pclk == 1 {
            bank.output[n] = not(bank.input[n]) & not(clear);
        }
        if phase.n_pclk == 1 {
            bank.input[n] = if carry == 1 {
                bank.output[n] & not(phase.res)
            } else {
                not(bank.output[n])
            };
        }

        carry = if n == GROUP_CARRY_CELL {
            group_carry(&bank.output)
        } else {
            bank.output[n] & carry
        };
        bus[n] = bank.output[n] & not(phase.res);
    }
}

fn h_group_carry(out: &Bus9) -> Signal {
    not(not(out[0]) | not(out[1]) | not(out[2]) | not(out[3]) | not(out[4]))
}

fn v_group_carry(out: &Bus9, vin: Signal) -> Signal {
    not(not(out[0]) | not(out[1]) | not(out[2]) | not(out[3]) | not(out[4]) | not(vin))
}

/// V counter enable. Decodes one dot per line (H = 340).
fn v_carry_in(h: &Bus9) -> Signal {
    let nh = |n: usize| not(h[n]);
    not(h[0] | h[1] | nh(2) | h[3] | nh(4) | h[5] | nh(6) | h[7] | nh(8))
}
