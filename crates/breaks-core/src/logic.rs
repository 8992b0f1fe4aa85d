//! Single-bit logic primitives.
//!
//! Every derived signal in the engine is built from these four functions.
//! Inputs may carry garbage above bit 0 (a raw `!a` for instance), so each
//! primitive masks its operands to the least significant bit before use and
//! always returns 0 or 1.

use crate::error::Error;

/// One wire value. Only 0 and 1 are meaningful.
pub type Signal = u8;

/// Extracts bit 0.
#[inline(always)]
pub const fn bit(n: u8) -> Signal {
    n & 1
}

#[inline(always)]
pub const fn not(a: Signal) -> Signal {
    !a & 1
}

#[inline(always)]
pub const fn nand(a: Signal, b: Signal) -> Signal {
    !((a & 1) & (b & 1)) & 1
}

#[inline(always)]
pub const fn nor(a: Signal, b: Signal) -> Signal {
    !((a & 1) | (b & 1)) & 1
}

/// Packs a bus into an integer, bit `i` taken from `bus[i]`.
///
/// Diagnostics only. Decode formulas never compare against packed values.
pub fn pack(bus: &[Signal]) -> u32 {
    bus.iter()
        .enumerate()
        .fold(0, |acc, (i, &s)| acc | (u32::from(bit(s)) << i))
}

/// Boundary check for pad values supplied by a driver.
///
/// The step functions assume well-formed 0/1 inputs; callers that accept
/// values from outside (scripts, FFI, user input) run them through here first.
pub fn checked_signal(pad: &'static str, value: u8) -> Result<Signal, Error> {
    match value {
        0 | 1 => Ok(value),
        _ => Err(Error::InvalidSignal { pad, value }),
    }
}
