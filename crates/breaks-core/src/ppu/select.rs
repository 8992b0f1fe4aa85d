//! H and V select decoders.
//!
//! Every formula is a NOR over literals of one counter bus, written exactly as
//! the gate appears on the die. The dot or line each formula recognizes is a
//! consequence of the gate, recorded next to it as a pattern string (bit 8
//! first, `x` for an input the gate does not look at). Decoding never reads the
//! pattern; the tests below check the two against each other.

use crate::logic::{Signal, not};
use crate::ppu::{Bus9, PpuContext};

pub const H_SELECT_COUNT: usize = 23;
pub const V_SELECT_COUNT: usize = 9;

/// H select feeding the front porch end latch (dot 279).
pub const FRONT_PORCH_END: usize = 0;
/// H select feeding the front porch start latch (dot 256).
pub const FRONT_PORCH_START: usize = 1;
/// H select feeding the unnamed `aux` output.
pub const AUX: usize = 2;
/// H select for the first eight dots of each 256-dot half.
pub const FIRST_TILE: usize = 3;
/// H select for the visible half of the line.
pub const LEFT_HALF: usize = 4;
/// H select for dots 336..339, feeding `ZHPOS`.
pub const ZERO_HPOS: usize = 5;

#[derive(Clone, Copy)]
pub struct SelectFormula {
    pub name: &'static str,
    /// Bus value(s) the gate fires on, bit 8 first.
    pub pattern: &'static str,
    pub decode: fn(&Bus9) -> Signal,
}

impl std::fmt::Debug for SelectFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectFormula")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

impl SelectFormula {
    /// True when the gate recognizes exactly one bus value.
    pub fn is_single_value(&self) -> bool {
        !self.pattern.contains('x')
    }

    /// Whether `value` matches the pattern string.
    pub fn pattern_matches(&self, value: u16) -> bool {
        self.pattern.bytes().rev().enumerate().all(|(n, c)| {
            let b = (value >> n) & 1;
            match c {
                b'0' => b == 0,
                b'1' => b == 1,
                _ => true,
            }
        })
    }
}

pub static H_SELECT: [SelectFormula; H_SELECT_COUNT] = [
    SelectFormula {
        name: "front_porch_end",
        pattern: "100010111",
        decode: |h: &Bus9| {
            not(not(h[0]) | not(h[1]) | not(h[2]) | h[3] | not(h[4]) | h[5] | h[6] | h[7] | not(h[8]))
        },
    },
    SelectFormula {
        name: "front_porch_start",
        pattern: "100000000",
        decode: |h: &Bus9| {
            not(h[0] | h[1] | h[2] | h[3] | h[4] | h[5] | h[6] | h[7] | not(h[8]))
        },
    },
    SelectFormula {
        name: "h_065",
        pattern: "001000001",
        decode: |h: &Bus9| {
            not(not(h[0]) | h[1] | h[2] | h[3] | h[4] | h[5] | not(h[6]) | h[7] | h[8])
        },
    },
    SelectFormula {
        name: "h_first_tile",
        pattern: "x00000xxx",
        decode: |h: &Bus9| not(h[3] | h[4] | h[5] | h[6] | h[7]),
    },
    SelectFormula {
        name: "h_left_half",
        pattern: "0xxxxxxxx",
        decode: |h: &Bus9| not(h[8]),
    },
    SelectFormula {
        name: "h_336_339",
        pattern: "1010100xx",
        decode: |h: &Bus9| not(h[2] | h[3] | not(h[4]) | h[5] | not(h[6]) | h[7] | not(h[8])),
    },
    SelectFormula {
        name: "h_063",
        pattern: "000111111",
        decode: |h: &Bus9| {
            not(not(h[0])
                | not(h[1])
                | not(h[2])
                | not(h[3])
                | not(h[4])
                | not(h[5])
                | h[6]
                | h[7]
                | h[8])
        },
    },
    SelectFormula {
        name: "h_255",
        pattern: "x11111111",
        decode: |h: &Bus9| {
            not(not(h[0])
                | not(h[1])
                | not(h[2])
                | not(h[3])
                | not(h[4])
                | not(h[5])
                | not(h[6])
                | not(h[7]))
        },
    },
    SelectFormula {
        name: "h_000_063",
        pattern: "000xxxxxx",
        decode: |h: &Bus9| not(h[6] | h[7] | h[8]),
    },
    SelectFormula {
        name: "h_256_319",
        pattern: "100xxxxxx",
        decode: |h: &Bus9| not(h[6] | h[7] | not(h[8])),
    },
    SelectFormula {
        name: "h_left_half_b",
        pattern: "0xxxxxxxx",
        decode: |h: &Bus9| not(h[8]),
    },
    SelectFormula {
        name: "h_phase_01",
        pattern: "xxxxxx00x",
        decode: |h: &Bus9| not(h[1] | h[2]),
    },
    SelectFormula {
        name: "h_phase_67",
        pattern: "xxxxxx11x",
        decode: |h: &Bus9| not(not(h[1]) | not(h[2])),
    },
    SelectFormula {
        name: "h_phase_45",
        pattern: "xxxxxx10x",
        decode: |h: &Bus9| not(h[1] | not(h[2])),
    },
    SelectFormula {
        name: "h_320_335",
        pattern: "1x100xxxx",
        decode: |h: &Bus9| not(h[4] | h[5] | not(h[6]) | not(h[8])),
    },
    SelectFormula {
        name: "h_left_half_c",
        pattern: "0xxxxxxxx",
        decode: |h: &Bus9| not(h[8]),
    },
    SelectFormula {
        name: "h_phase_23",
        pattern: "xxxxxx01x",
        decode: |h: &Bus9| not(not(h[1]) | h[2]),
    },
    SelectFormula {
        name: "h_270",
        pattern: "100001110",
        decode: |h: &Bus9| {
            not(h[0] | not(h[1]) | not(h[2]) | not(h[3]) | h[4] | h[5] | h[6] | h[7] | not(h[8]))
        },
    },
    SelectFormula {
        name: "h_328",
        pattern: "101001000",
        decode: |h: &Bus9| {
            not(h[0] | h[1] | h[2] | not(h[3]) | h[4] | h[5] | not(h[6]) | h[7] | not(h[8]))
        },
    },
    SelectFormula {
        name: "h_279",
        pattern: "100010111",
        decode: |h: &Bus9| {
            not(not(h[0]) | not(h[1]) | not(h[2]) | h[3] | not(h[4]) | h[5] | h[6] | h[7] | not(h[8]))
        },
    },
    SelectFormula {
        name: "h_304",
        pattern: "100110000",
        decode: |h: &Bus9| {
            not(h[0] | h[1] | h[2] | h[3] | not(h[4]) | not(h[5]) | h[6] | h[7] | not(h[8]))
        },
    },
    SelectFormula {
        name: "h_323",
        pattern: "101000011",
        decode: |h: &Bus9| {
            not(not(h[0]) | not(h[1]) | h[2] | h[3] | h[4] | h[5] | not(h[6]) | h[7] | not(h[8]))
        },
    },
    SelectFormula {
        name: "h_308",
        pattern: "100110100",
        decode: |h: &Bus9| {
            not(h[0] | h[1] | not(h[2]) | h[3] | not(h[4]) | not(h[5]) | h[6] | h[7] | not(h[8]))
        },
    },
];

pub static V_SELECT: [SelectFormula; V_SELECT_COUNT] = [
    SelectFormula {
        name: "v_247",
        pattern: "x11110111",
        decode: |v: &Bus9| {
            not(not(v[0]) | not(v[1]) | not(v[2]) | v[3] | not(v[4]) | not(v[5]) | not(v[6]) | not(v[7]))
        },
    },
    SelectFormula {
        name: "v_244",
        pattern: "x11110100",
        decode: |v: &Bus9| {
            not(v[0] | v[1] | not(v[2]) | v[3] | not(v[4]) | not(v[5]) | not(v[6]) | not(v[7]))
        },
    },
    SelectFormula {
        name: "v_261",
        pattern: "100000101",
        decode: |v: &Bus9| {
            not(not(v[0]) | v[1] | not(v[2]) | v[3] | v[4] | v[5] | v[6] | v[7] | not(v[8]))
        },
    },
    SelectFormula {
        name: "v_241",
        pattern: "x11110001",
        decode: |v: &Bus9| {
            not(not(v[0]) | v[1] | v[2] | v[3] | not(v[4]) | not(v[5]) | not(v[6]) | not(v[7]))
        },
    },
    SelectFormula {
        name: "v_241_b",
        pattern: "x11110001",
        decode: |v: &Bus9| {
            not(not(v[0]) | v[1] | v[2] | v[3] | not(v[4]) | not(v[5]) | not(v[6]) | not(v[7]))
        },
    },
    SelectFormula {
        name: "v_000",
        pattern: "000000000",
        decode: |v: &Bus9| not(v[0] | v[1] | v[2] | v[3] | v[4] | v[5] | v[6] | v[7] | v[8]),
    },
    SelectFormula {
        name: "v_240",
        pattern: "x11110000",
        decode: |v: &Bus9| {
            not(v[0] | v[1] | v[2] | v[3] | not(v[4]) | not(v[5]) | not(v[6]) | not(v[7]))
        },
    },
    SelectFormula {
        name: "v_261_b",
        pattern: "100000101",
        decode: |v: &Bus9| {
            not(not(v[0]) | v[1] | not(v[2]) | v[3] | v[4] | v[5] | v[6] | v[7] | not(v[8]))
        },
    },
    SelectFormula {
        name: "v_261_c",
        pattern: "100000101",
        decode: |v: &Bus9| {
            not(not(v[0]) | v[1] | not(v[2]) | v[3] | v[4] | v[5] | v[6] | v[7] | not(v[8]))
        },
    },
];

pub fn h_select_index(name: &str) -> Option<usize> {
    H_SELECT.iter().position(|f| f.name == name)
}

pub fn v_select_index(name: &str) -> Option<usize> {
    V_SELECT.iter().position(|f| f.name == name)
}

pub(crate) fn decode(ppu: &mut PpuContext) {
    for (out, formula) in ppu.bus.hsel.iter_mut().zip(H_SELECT.iter()) {
        *out = (formula.decode)(&ppu.bus.h);
    }
    for (out, formula) in ppu.bus.vsel.iter_mut().zip(V_SELECT.iter()) {
        *out = (formula.decode)(&ppu.bus.v);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::ppu::COUNTER_BITS;
    use crate::ppu::test_util::{pixels, running};
    use crate::trace::VideoEvent;

    fn bus(value: u16) -> Bus9 {
        let mut b = [0; COUNTER_BITS];
        for (n, cell) in b.iter_mut().enumerate() {
            *cell = ((value >> n) & 1) as Signal;
        }
        b
    }

    fn check_table(table: &[SelectFormula]) {
        for formula in table {
            assert_eq!(formula.pattern.len(), COUNTER_BITS, "{}", formula.name);
            for value in 0..512u16 {
                assert_eq!(
                    (formula.decode)(&bus(value)) == 1,
                    formula.pattern_matches(value),
                    "{} at {value}",
                    formula.name
                );
            }
        }
    }

    #[test]
    fn h_gates_match_their_patterns() {
        check_table(&H_SELECT);
    }

    #[test]
    fn v_gates_match_their_patterns() {
        check_table(&V_SELECT);
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = H_SELECT.iter().chain(V_SELECT.iter()).map(|f| f.name).collect();
        assert_eq!(names.len(), H_SELECT_COUNT + V_SELECT_COUNT);
        assert_eq!(h_select_index("front_porch_start"), Some(FRONT_PORCH_START));
        assert_eq!(h_select_index("h_336_339"), Some(ZERO_HPOS));
        assert_eq!(v_select_index("v_000"), Some(5));
        assert_eq!(v_select_index("front_porch_start"), None);
    }

    fn single_value_asserted(ppu: &PpuContext) -> Vec<usize> {
        VideoEvent::capture(ppu)
            .asserted_h()
            .filter(|&i| H_SELECT[i].is_single_value())
            .collect()
    }

    #[test]
    fn dot_256_is_the_only_single_dot_gate_after_256_pixels() {
        let mut ppu = running();
        pixels(&mut ppu, 256);
        assert_eq!(single_value_asserted(&ppu), [FRONT_PORCH_START]);
    }

    #[test]
    fn dot_279_fires_after_279_pixels() {
        let mut ppu = running();
        pixels(&mut ppu, 279);
        assert_eq!(single_value_asserted(&ppu), [FRONT_PORCH_END, 19]);
        assert_eq!(ppu.hsel(h_select_index("h_279").expect("h_279")), Some(1));
        assert_eq!(ppu.hsel(H_SELECT_COUNT), None);
    }

    #[test]
    fn line_zero_decodes_from_power_up() {
        let mut ppu = running();
        pixels(&mut ppu, 1);
        assert_eq!(ppu.vsel(v_select_index("v_000").expect("v_000")), Some(1));
        assert_eq!(ppu.bus.vsel.iter().filter(|&&s| s == 1).count(), 1);
    }

    #[test]
    fn debug_omits_the_function_pointer() {
        let text = format!("{:?}", H_SELECT[FRONT_PORCH_END]);
        assert!(text.contains("front_porch_end"));
        assert!(text.contains(".."));
    }
}
