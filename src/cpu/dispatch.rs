/*!
dispatch.rs - The opcode dispatcher: fetch-at-PC, advance-PC, decode, and
hand off to the right operand resolution plus semantic helper.

Overview
========
`step` is a single 256-arm match on the freshly fetched opcode byte. Most
arms share one of a handful of bit-field shapes (a 3-bit register code, a
2-bit register-pair code, a 3-bit condition code) decoded once per family
rather than opcode-by-opcode; `cpu::addressing` and `cpu::ops::control`
own those shared decodings. The eight documented opcode aliases (0x08,
0x10, 0x18, 0x20, 0x28, 0x30, 0x38 as NOP; 0xCB as JMP; 0xD9 as RET; 0xDD,
0xED, 0xFD as CALL) are routed explicitly alongside their canonical
opcodes rather than falling through to a default case.

Every one of the 256 byte values is covered by an explicit arm or a
bitmask guard; the trailing wildcard exists only to satisfy the match
exhaustiveness checker (guards aren't visible to it) and can never
actually run.

Control transfer to the two CP/M-shimmed addresses (see `cpu::cpm`) is
intercepted inside the JMP/Jcc/CALL/Ccc arms rather than being allowed to
execute as an ordinary jump into unmapped memory.
*/

#![allow(dead_code)]

use crate::cpu::addressing::{
    fetch_u16, fetch_u8, read_reg8, read_reg_pair_psw, read_reg_pair_sp, write_reg8,
    write_reg_pair_psw, write_reg_pair_sp,
};
use crate::cpu::cpm;
use crate::cpu::ops::{arithmetic, control, logical, pair, rotate};
use crate::memory::Memory;
use crate::ports::PortBus;
use crate::registers::Registers;

/// Execute the instruction at `regs.pc`, advancing PC past it, and return
/// its mnemonic for the trace observer. `halted` and `interrupts_enabled`
/// are owned by the caller (`Cpu`) and mutated in place by HLT/EI/DI/RST
/// and the CP/M warm-boot intercept.
pub fn step(
    regs: &mut Registers,
    mem: &mut Memory,
    ports: &mut dyn PortBus,
    halted: &mut bool,
    interrupts_enabled: &mut bool,
    bdos_output: &mut Vec<u8>,
) -> &'static str {
    let opcode = fetch_u8(regs, mem);

    match opcode {
        0x76 => {
            *halted = true;
            "HLT"
        }

        0x40..=0x7F => {
            let dst = (opcode >> 3) & 0x07;
            let src = opcode & 0x07;
            let value = read_reg8(src, regs, mem);
            write_reg8(dst, value, regs, mem);
            "MOV"
        }

        0x80..=0xBF => {
            let family = (opcode - 0x80) >> 3;
            let code = opcode & 0x07;
            let operand = read_reg8(code, regs, mem);
            match family {
                0 => {
                    arithmetic::add(regs, operand);
                    "ADD"
                }
                1 => {
                    arithmetic::adc(regs, operand);
                    "ADC"
                }
                2 => {
                    arithmetic::sub(regs, operand);
                    "SUB"
                }
                3 => {
                    arithmetic::sbb(regs, operand);
                    "SBB"
                }
                4 => {
                    logical::ana(regs, operand);
                    "ANA"
                }
                5 => {
                    logical::xra(regs, operand);
                    "XRA"
                }
                6 => {
                    logical::ora(regs, operand);
                    "ORA"
                }
                7 => {
                    logical::cmp(regs, operand);
                    "CMP"
                }
                _ => unreachable!("family is a 3-bit value"),
            }
        }

        0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => "NOP",

        0x07 => {
            rotate::rlc(regs);
            "RLC"
        }
        0x0F => {
            rotate::rrc(regs);
            "RRC"
        }
        0x17 => {
            rotate::ral(regs);
            "RAL"
        }
        0x1F => {
            rotate::rar(regs);
            "RAR"
        }
        0x27 => {
            arithmetic::daa(regs);
            "DAA"
        }
        0x2F => {
            rotate::cma(regs);
            "CMA"
        }
        0x37 => {
            rotate::stc(regs);
            "STC"
        }
        0x3F => {
            rotate::cmc(regs);
            "CMC"
        }

        0x02 => {
            mem.write(regs.bc(), regs.a);
            "STAX"
        }
        0x12 => {
            mem.write(regs.de(), regs.a);
            "STAX"
        }
        0x0A => {
            regs.a = mem.read(regs.bc());
            "LDAX"
        }
        0x1A => {
            regs.a = mem.read(regs.de());
            "LDAX"
        }

        0x22 => {
            let addr = fetch_u16(regs, mem);
            mem.write_word_no_wrap(addr, regs.hl());
            "SHLD"
        }
        0x2A => {
            let addr = fetch_u16(regs, mem);
            let (lo, hi) = mem.read_word_no_wrap(addr);
            regs.l = lo;
            if let Some(h) = hi {
                regs.h = h;
            }
            "LHLD"
        }
        0x32 => {
            let addr = fetch_u16(regs, mem);
            mem.write(addr, regs.a);
            "STA"
        }
        0x3A => {
            let addr = fetch_u16(regs, mem);
            regs.a = mem.read(addr);
            "LDA"
        }

        0xEB => {
            let de = regs.de();
            let hl = regs.hl();
            regs.set_de(hl);
            regs.set_hl(de);
            "XCHG"
        }

        0xC6 => {
            let imm = fetch_u8(regs, mem);
            arithmetic::add(regs, imm);
            "ADI"
        }
        0xCE => {
            let imm = fetch_u8(regs, mem);
            arithmetic::adc(regs, imm);
            "ACI"
        }
        0xD6 => {
            let imm = fetch_u8(regs, mem);
            arithmetic::sub(regs, imm);
            "SUI"
        }
        0xDE => {
            let imm = fetch_u8(regs, mem);
            arithmetic::sbb(regs, imm);
            "SBI"
        }
        0xE6 => {
            let imm = fetch_u8(regs, mem);
            logical::ana(regs, imm);
            "ANI"
        }
        0xEE => {
            let imm = fetch_u8(regs, mem);
            logical::xra(regs, imm);
            "XRI"
        }
        0xF6 => {
            let imm = fetch_u8(regs, mem);
            logical::ora(regs, imm);
            "ORI"
        }
        0xFE => {
            let imm = fetch_u8(regs, mem);
            logical::cmp(regs, imm);
            "CPI"
        }

        0xE3 => {
            pair::xthl(regs, mem);
            "XTHL"
        }
        0xF9 => {
            pair::sphl(regs);
            "SPHL"
        }
        0xE9 => {
            pair::pchl(regs);
            "PCHL"
        }

        0xC3 | 0xCB => {
            let target = fetch_u16(regs, mem);
            jump_or_warm_boot(regs, halted, target);
            "JMP"
        }

        0xCD | 0xDD | 0xED | 0xFD => {
            let target = fetch_u16(regs, mem);
            call_or_shim(regs, mem, halted, bdos_output, target);
            "CALL"
        }

        0xC9 | 0xD9 => {
            regs.pc = pair::pop(regs, mem);
            "RET"
        }

        0xDB => {
            let port = fetch_u8(regs, mem);
            regs.a = ports.input(port);
            "IN"
        }
        0xD3 => {
            let port = fetch_u8(regs, mem);
            ports.output(port, regs.a);
            "OUT"
        }

        0xF3 => {
            *interrupts_enabled = false;
            "DI"
        }
        0xFB => {
            *interrupts_enabled = true;
            "EI"
        }

        _ if opcode & 0xC7 == 0x04 => {
            let code = (opcode >> 3) & 0x07;
            let value = read_reg8(code, regs, mem);
            let result = arithmetic::inr(regs, value);
            write_reg8(code, result, regs, mem);
            "INR"
        }
        _ if opcode & 0xC7 == 0x05 => {
            let code = (opcode >> 3) & 0x07;
            let value = read_reg8(code, regs, mem);
            let result = arithmetic::dcr(regs, value);
            write_reg8(code, result, regs, mem);
            "DCR"
        }
        _ if opcode & 0xC7 == 0x06 => {
            let code = (opcode >> 3) & 0x07;
            let imm = fetch_u8(regs, mem);
            write_reg8(code, imm, regs, mem);
            "MVI"
        }

        _ if opcode & 0xCF == 0x01 => {
            let rp = (opcode >> 4) & 0x03;
            let imm = fetch_u16(regs, mem);
            write_reg_pair_sp(rp, imm, regs);
            "LXI"
        }
        _ if opcode & 0xCF == 0x03 => {
            let rp = (opcode >> 4) & 0x03;
            let value = read_reg_pair_sp(rp, regs);
            write_reg_pair_sp(rp, pair::inx(value), regs);
            "INX"
        }
        _ if opcode & 0xCF == 0x0B => {
            let rp = (opcode >> 4) & 0x03;
            let value = read_reg_pair_sp(rp, regs);
            write_reg_pair_sp(rp, pair::dcx(value), regs);
            "DCX"
        }
        _ if opcode & 0xCF == 0x09 => {
            let rp = (opcode >> 4) & 0x03;
            let operand = read_reg_pair_sp(rp, regs);
            pair::dad(regs, operand);
            "DAD"
        }

        _ if opcode & 0xCF == 0xC5 => {
            let rp = (opcode >> 4) & 0x03;
            let value = read_reg_pair_psw(rp, regs);
            pair::push(regs, mem, value);
            "PUSH"
        }
        _ if opcode & 0xCF == 0xC1 => {
            let rp = (opcode >> 4) & 0x03;
            let value = pair::pop(regs, mem);
            write_reg_pair_psw(rp, value, regs);
            "POP"
        }

        _ if opcode & 0xC7 == 0xC2 => {
            let cc = (opcode >> 3) & 0x07;
            let target = fetch_u16(regs, mem);
            if control::test_condition(cc, regs) {
                jump_or_warm_boot(regs, halted, target);
            }
            "JCC"
        }
        _ if opcode & 0xC7 == 0xC4 => {
            let cc = (opcode >> 3) & 0x07;
            let target = fetch_u16(regs, mem);
            if control::test_condition(cc, regs) {
                call_or_shim(regs, mem, halted, bdos_output, target);
            }
            "CCC"
        }
        _ if opcode & 0xC7 == 0xC0 => {
            let cc = (opcode >> 3) & 0x07;
            if control::test_condition(cc, regs) {
                regs.pc = pair::pop(regs, mem);
            }
            "RCC"
        }
        _ if opcode & 0xC7 == 0xC7 => {
            let vector = (opcode >> 3) & 0x07;
            pair::push(regs, mem, regs.pc);
            regs.pc = (vector as u16) * 8;
            "RST"
        }

        _ => unreachable!("every opcode byte is matched above by a literal arm or bitmask guard"),
    }
}

/// Shared JMP/Jcc tail: the CP/M warm-boot address halts instead of being
/// jumped to.
#[inline]
fn jump_or_warm_boot(regs: &mut Registers, halted: &mut bool, target: u16) {
    if cpm::intercept_jmp(target) {
        *halted = true;
    } else {
        regs.pc = target;
    }
}

/// Shared CALL/Ccc tail: the BDOS entry point is handled in place (no
/// push, no jump); the warm-boot address halts instead of being called.
#[inline]
fn call_or_shim(
    regs: &mut Registers,
    mem: &mut Memory,
    halted: &mut bool,
    bdos_output: &mut Vec<u8>,
    target: u16,
) {
    match cpm::intercept_call(target, regs, mem, bdos_output) {
        Some(true) => *halted = true,
        Some(false) => {}
        None => {
            pair::push(regs, mem, regs.pc);
            regs.pc = target;
        }
    }
}
