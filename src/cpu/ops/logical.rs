/*!
ops/logical.rs - ANA/ANI, XRA/XRI, ORA/ORI, and CMP/CPI.

Overview
========
AND/XOR/OR always clear Carry; AND additionally sets Auxiliary Carry via
the documented OR-of-operands quirk (`flags::and_aux_carry`) rather than a
true half-carry, while XOR/OR clear it. CMP/CPI run the same subtraction
the SUB family uses but discard the result, leaving A untouched.
*/

#![allow(dead_code)]

use crate::flags::{and_aux_carry, sub_flags, zsp};
use crate::registers::Registers;

#[inline]
fn apply_logical_result(regs: &mut Registers, result: u8, aux_carry: bool) {
    let (zero, sign, parity_even) = zsp(result);
    regs.a = result;
    regs.zero = zero;
    regs.sign = sign;
    regs.parity_even = parity_even;
    regs.aux_carry = aux_carry;
    regs.carry = false;
}

/// ANA / ANI: `A = A & operand`.
pub fn ana(regs: &mut Registers, operand: u8) {
    let aux_carry = and_aux_carry(regs.a, operand);
    let result = regs.a & operand;
    apply_logical_result(regs, result, aux_carry);
}

/// XRA / XRI: `A = A ^ operand`.
pub fn xra(regs: &mut Registers, operand: u8) {
    let result = regs.a ^ operand;
    apply_logical_result(regs, result, false);
}

/// ORA / ORI: `A = A | operand`.
pub fn ora(regs: &mut Registers, operand: u8) {
    let result = regs.a | operand;
    apply_logical_result(regs, result, false);
}

/// CMP / CPI: compare `A` against `operand` without modifying `A`.
pub fn cmp(regs: &mut Registers, operand: u8) {
    let f = sub_flags(regs.a, operand, false);
    regs.zero = f.zero;
    regs.sign = f.sign;
    regs.parity_even = f.parity_even;
    regs.aux_carry = f.aux_carry;
    regs.carry = f.carry;
}
