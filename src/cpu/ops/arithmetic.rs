/*!
ops/arithmetic.rs - ADD/ADC/SUB/SBB (and their immediate forms), INR/DCR,
and DAA.

Overview
========
ADD-class and SUB-class instructions are thin wrappers over
`flags::add_flags`/`flags::sub_flags` that write the result and all five
flags back into `Registers`. INR/DCR reuse the same helpers but must
leave Carry untouched (the 8080 documents INR/DCR as affecting Z, S, P,
AC only). DAA is the one genuinely stateful algorithm in this family: see
the inline comment for the two-nibble correction it applies.
*/

#![allow(dead_code)]

use crate::flags::{add_flags, sub_flags};
use crate::registers::Registers;

#[inline]
fn apply(regs: &mut Registers, f: crate::flags::ArithFlags) {
    regs.zero = f.zero;
    regs.sign = f.sign;
    regs.parity_even = f.parity_even;
    regs.aux_carry = f.aux_carry;
    regs.carry = f.carry;
}

/// ADD / ADI: `A = A + operand`.
pub fn add(regs: &mut Registers, operand: u8) {
    let f = add_flags(regs.a, operand, false);
    regs.a = f.result;
    apply(regs, f);
}

/// ADC / ACI: `A = A + operand + Carry`.
pub fn adc(regs: &mut Registers, operand: u8) {
    let f = add_flags(regs.a, operand, regs.carry);
    regs.a = f.result;
    apply(regs, f);
}

/// SUB / SUI: `A = A - operand`.
pub fn sub(regs: &mut Registers, operand: u8) {
    let f = sub_flags(regs.a, operand, false);
    regs.a = f.result;
    apply(regs, f);
}

/// SBB / SBI: `A = A - operand - Carry`.
pub fn sbb(regs: &mut Registers, operand: u8) {
    let f = sub_flags(regs.a, operand, regs.carry);
    regs.a = f.result;
    apply(regs, f);
}

/// INR r / INR M: increment an 8-bit operand by 1. Affects Z, S, P, AC;
/// Carry is left untouched. Returns the incremented value for the caller
/// to write back to the register or memory cell it came from.
pub fn inr(regs: &mut Registers, value: u8) -> u8 {
    let f = add_flags(value, 1, false);
    regs.zero = f.zero;
    regs.sign = f.sign;
    regs.parity_even = f.parity_even;
    regs.aux_carry = f.aux_carry;
    f.result
}

/// DCR r / DCR M: decrement an 8-bit operand by 1. Affects Z, S, P, AC;
/// Carry is left untouched.
pub fn dcr(regs: &mut Registers, value: u8) -> u8 {
    let f = sub_flags(value, 1, false);
    regs.zero = f.zero;
    regs.sign = f.sign;
    regs.parity_even = f.parity_even;
    regs.aux_carry = f.aux_carry;
    f.result
}

/// DAA: decimal-adjust A after a BCD addition.
///
/// Classic two-nibble correction: if the low nibble exceeds 9 or AC is
/// set, add 6 to the low nibble; if the (possibly corrected) high nibble
/// exceeds 9, or Carry is already set, or the high nibble is 9 and the low
/// nibble triggered the first correction, add 0x60 and set Carry. The
/// actual addition is run back through `add_flags` so Z/S/P/AC come out
/// correct for the corrected value; Carry is the logical OR of the
/// pre-existing/derived carry and any carry the final addition produces.
pub fn daa(regs: &mut Registers) {
    let lsb = regs.a & 0x0F;
    let msb = regs.a >> 4;

    let mut correction: u8 = 0;
    let mut carry = regs.carry;

    if regs.aux_carry || lsb > 9 {
        correction |= 0x06;
    }
    if carry || msb > 9 || (msb == 9 && lsb > 9) {
        correction |= 0x60;
        carry = true;
    }

    let f = add_flags(regs.a, correction, false);
    regs.a = f.result;
    regs.zero = f.zero;
    regs.sign = f.sign;
    regs.parity_even = f.parity_even;
    regs.aux_carry = f.aux_carry;
    regs.carry = carry || f.carry;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sets_carry_and_aux_carry() {
        let mut regs = Registers::new();
        regs.a = 0xFF;
        add(&mut regs, 0x01);
        assert_eq!(regs.a, 0x00);
        assert!(regs.zero);
        assert!(regs.carry);
        assert!(regs.aux_carry);
    }

    #[test]
    fn adc_includes_incoming_carry() {
        let mut regs = Registers::new();
        regs.a = 0x01;
        regs.carry = true;
        adc(&mut regs, 0x01);
        assert_eq!(regs.a, 0x03);
        assert!(!regs.carry);
    }

    #[test]
    fn sub_sets_carry_on_borrow() {
        let mut regs = Registers::new();
        regs.a = 0x00;
        sub(&mut regs, 0x01);
        assert_eq!(regs.a, 0xFF);
        assert!(regs.carry);
    }

    #[test]
    fn inr_does_not_touch_carry() {
        let mut regs = Registers::new();
        regs.a = 0xFF;
        regs.carry = true;
        let a = regs.a;
        let result = inr(&mut regs, a);
        assert_eq!(result, 0x00);
        assert!(regs.zero);
        assert!(regs.carry, "INR must not clear a pre-existing Carry");
    }

    #[test]
    fn dcr_does_not_touch_carry() {
        let mut regs = Registers::new();
        regs.carry = false;
        let result = dcr(&mut regs, 0x01);
        assert_eq!(result, 0x00);
        assert!(regs.zero);
        assert!(!regs.carry);
    }

    #[test]
    fn daa_after_bcd_addition_example() {
        // 0x9A with all flags clear: classic textbook DAA case.
        let mut regs = Registers::new();
        regs.a = 0x9A;
        daa(&mut regs);
        assert_eq!(regs.a, 0x00);
        assert!(regs.carry);
        assert!(regs.aux_carry);
        assert!(regs.zero);
        assert!(!regs.sign);
        assert!(regs.parity_even);
    }

    #[test]
    fn daa_low_nibble_only_correction() {
        // 0x0F + 0x01 = 0x10 produced AC; DAA should fold it into 0x10 unchanged
        // (low nibble already 0 after the add, high nibble 1 is untouched).
        let mut regs = Registers::new();
        regs.a = 0x10;
        regs.aux_carry = true;
        daa(&mut regs);
        assert_eq!(regs.a, 0x16);
    }
}
