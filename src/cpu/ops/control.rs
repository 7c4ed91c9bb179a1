/*!
ops/control.rs - Condition-code evaluation shared by Jcc, Ccc, Rcc, and the
dispatcher's decision of whether a conditional jump/call/return is taken.

Overview
========
The 8080 packs the same 3-bit condition code into the same bit position
(bits 3-5 of the opcode) for all three conditional families. Taking the
branch is otherwise just ordinary jump/call/return, so only the predicate
lives here; PC/stack manipulation stays in the dispatcher next to the
unconditional forms it shares code with.
*/

#![allow(dead_code)]

use crate::registers::Registers;

/// Evaluate a 3-bit condition code against the current flags:
/// 000=NZ 001=Z 010=NC 011=C 100=PO 101=PE 110=P(lus) 111=M(inus)
#[inline]
pub fn test_condition(code: u8, regs: &Registers) -> bool {
    match code & 0x07 {
        0 => !regs.zero,
        1 => regs.zero,
        2 => !regs.carry,
        3 => regs.carry,
        4 => !regs.parity_even,
        5 => regs.parity_even,
        6 => !regs.sign,
        7 => regs.sign,
        _ => unreachable!("3-bit code"),
    }
}
