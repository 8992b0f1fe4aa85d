//! T-state sequencer.
//!
//! Four latch cells, each split into an "in" half written during PHI1 and an
//! "out" half written during PHI2. Every cell inverts between its halves and
//! the chain shifts cell `i - 1` into cell `i`, with cell 0 closing the ring
//! through cell 3. The result is a Johnson counter with a period of eight
//! PHI1/PHI2 pairs.
//!
//! SYNC is latched on PHI2. On the following PHI1 it seeds cell 0 with 1 and
//! blanks the shift into cells 1..=3, so the next PHI2 always lands on
//! [`SEED_CODE`]. With READY low each "in" half reloads the complement of its
//! own "out" half and the code holds while the clock keeps running.

#[cfg(feature = "savestate-serde")]
use serde::{Deserialize, Serialize};

use crate::cpu::CpuContext;
use crate::logic::{Signal, bit, nand, nor, not, pack};

pub const T_CELLS: usize = 4;

/// Code sequence starting from the SYNC seed, one entry per PHI2.
pub const JOHNSON_SEQUENCE: [u8; 8] = [
    0b1110, 0b0011, 0b1000, 0b1111, 0b0001, 0b1100, 0b0111, 0b0000,
];

/// Code produced by the PHI2 that follows a latched SYNC.
pub const SEED_CODE: u8 = JOHNSON_SEQUENCE[0];

/// Code forced by the synchronous reset.
pub const RESET_CODE: u8 = 0b1111;

#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TStateBank {
    pub input: [Signal; T_CELLS],
    pub output: [Signal; T_CELLS],
    /// SYNC as seen on the last PHI2.
    pub sync_latch: Signal,
}

impl TStateBank {
    pub fn code(&self) -> u8 {
        pack(&self.output) as u8
    }
}

pub(crate) fn step(cpu: &mut CpuContext) -> u8 {
    cpu.ctrl.t_res = not(cpu.pad.n_res);
    let t = &mut cpu.t;

    if cpu.ctrl.phi2 == 1 {
        let n_res = not(cpu.ctrl.t_res);
        for n in 0..T_CELLS {
            // NOT(in), or 1 while reset is held.
            t.output[n] = nand(t.input[n], n_res);
        }
        t.sync_latch = bit(cpu.pad.sync);
    }

    if cpu.ctrl.phi1 == 1 {
        if bit(cpu.pad.rdy) == 1 {
            let sync = t.sync_latch;
            t.input[0] = nand(not(sync), t.output[T_CELLS - 1]);
            for n in 1..T_CELLS {
                t.input[n] = nor(sync, not(t.output[n - 1]));
            }
        } else {
            for n in 0..T_CELLS {
                t.input[n] = not(t.output[n]);
            }
        }
    }

    t.code()
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::cpu::advance_t_state;

    fn running() -> CpuContext {
        let mut cpu = CpuContext::new();
        cpu.pad.n_res = 1;
        cpu.pad.rdy = 1;
        cpu
    }

    /// One PHI1 half followed by one PHI2 half; returns the code after PHI2.
    fn cycle(cpu: &mut CpuContext) -> u8 {
        cpu.pad.phi0 = 0;
        advance_t_state(cpu);
        cpu.pad.phi0 = 1;
        advance_t_state(cpu)
    }

    /// Pulses SYNC for exactly one PHI2 and returns the seeded code.
    fn seed(cpu: &mut CpuContext) -> u8 {
        cpu.pad.phi0 = 1;
        cpu.pad.sync = 1;
        advance_t_state(cpu);
        cpu.pad.sync = 0;
        cycle(cpu)
    }

    #[test]
    fn sync_seeds_and_sequence_repeats_after_eight() {
        let mut cpu = running();
        // Scramble the chain first so the seed has something to override.
        for _ in 0..3 {
            cycle(&mut cpu);
        }
        assert_eq!(seed(&mut cpu), SEED_CODE);

        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(cycle(&mut cpu));
        }
        assert_eq!(seen[..7], JOHNSON_SEQUENCE[1..]);
        assert_eq!(seen[7], SEED_CODE);
    }

    #[test]
    fn sequence_codes_are_distinct() {
        let mut sorted = JOHNSON_SEQUENCE;
        sorted.sort_unstable();
        assert!(sorted.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn phi1_half_does_not_change_code() {
        let mut cpu = running();
        seed(&mut cpu);
        cpu.pad.phi0 = 0;
        assert_eq!(advance_t_state(&mut cpu), SEED_CODE);
        cpu.pad.phi0 = 1;
        assert_eq!(advance_t_state(&mut cpu), JOHNSON_SEQUENCE[1]);
    }

    #[test]
    fn ready_low_freezes_and_resumes() {
        let mut cpu = running();
        seed(&mut cpu);
        cycle(&mut cpu);
        cycle(&mut cpu);
        assert_eq!(cpu.t_state(), JOHNSON_SEQUENCE[2]);

        cpu.pad.rdy = 0;
        for _ in 0..5 {
            assert_eq!(cycle(&mut cpu), JOHNSON_SEQUENCE[2]);
        }

        cpu.pad.rdy = 1;
        for expected in &JOHNSON_SEQUENCE[3..] {
            assert_eq!(cycle(&mut cpu), *expected);
        }
        assert_eq!(cycle(&mut cpu), SEED_CODE);
    }

    #[test]
    fn ready_low_ignores_sync() {
        let mut cpu = running();
        seed(&mut cpu);
        cycle(&mut cpu);
        let held = cpu.t_state();

        cpu.pad.rdy = 0;
        cpu.pad.sync = 1;
        assert_eq!(cycle(&mut cpu), held);
        cpu.pad.sync = 0;
        assert_eq!(cycle(&mut cpu), held);
    }

    #[test]
    fn reset_forces_all_cells_high() {
        let mut cpu = running();
        seed(&mut cpu);
        cpu.pad.n_res = 0;
        assert_eq!(cycle(&mut cpu), RESET_CODE);
        assert_eq!(cycle(&mut cpu), RESET_CODE);

        // Released, the chain carries on from the reset pattern.
        cpu.pad.n_res = 1;
        let at = JOHNSON_SEQUENCE
            .iter()
            .position(|&c| c == RESET_CODE)
            .unwrap();
        assert_eq!(cycle(&mut cpu), JOHNSON_SEQUENCE[(at + 1) % 8]);
    }

    #[test]
    fn zeroed_context_free_runs_in_the_sequence() {
        let mut cpu = running();
        assert_eq!(cpu.t_state(), 0);
        let at = JOHNSON_SEQUENCE.iter().position(|&c| c == 0).unwrap();
        for i in 1..=16 {
            assert_eq!(cycle(&mut cpu), JOHNSON_SEQUENCE[(at + i) % 8]);
        }
    }

    #[test]
    fn random_stimulus_keeps_cells_single_bit() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x6502);
        let mut cpu = CpuContext::new();
        for _ in 0..4096 {
            cpu.pad.phi0 = rng.random_range(0..=1);
            cpu.pad.n_res = rng.random_range(0..=1);
            cpu.pad.rdy = rng.random_range(0..=1);
            cpu.pad.sync = rng.random_range(0..=1);
            let code = advance_t_state(&mut cpu);
            assert!(code <= 0x0F);
            assert!(cpu.t.input.iter().chain(&cpu.t.output).all(|&s| s <= 1));
            assert!(cpu.t.sync_latch <= 1);
        }
    }
}
