/*!
cpu::mod - Public façade for the Intel 8080 core.

Overview
========
`Cpu` owns a `Registers` and a `Memory`, plus the two pluggable
collaborators from the external-interfaces seam: a `PortBus` for IN/OUT
and an optional `Tracer` for instruction-level observation. Everything
instruction-shaped lives in the submodules below; this file is the thin
shell a caller actually constructs and drives.

    ops/          - Semantic helpers grouped by instruction family.
    addressing.rs - Operand resolution: register/pair codes, PC-relative
                    immediate fetch.
    dispatch.rs   - The 256-entry opcode dispatch table.
    cpm.rs        - The CP/M BDOS shim diagnostic ROMs expect.

Downstream code should treat `ops`/`addressing`/`dispatch`/`cpm` as
internal; `Cpu` plus the `ports`/`trace` traits are the supported surface.
*/

pub mod addressing;
pub mod cpm;
pub mod dispatch;
pub mod ops;

use crate::memory::{Memory, MemoryError};
use crate::ports::{NullPortBus, PortBus};
use crate::registers::Registers;
use crate::trace::{RegisterSnapshot, Tracer};

/// An Intel 8080 CPU: registers, a flat 64 KiB address space, and the
/// port/trace seams the embedding application attaches itself to.
pub struct Cpu {
    pub regs: Registers,
    pub mem: Memory,
    halted: bool,
    interrupts_enabled: bool,
    ports: Box<dyn PortBus>,
    tracer: Option<Box<dyn Tracer>>,
    bdos_output: Vec<u8>,
}

impl Default for Cpu {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A fresh CPU: zeroed registers, a blank address space, no ports or
    /// tracer attached, not halted, interrupts disabled (the 8080 powers
    /// up with interrupts masked until the program issues `EI`).
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            halted: false,
            interrupts_enabled: false,
            ports: Box::new(NullPortBus),
            tracer: None,
            bdos_output: Vec::new(),
        }
    }

    /// Reset registers and CPU-control state and set PC to `pc`, leaving
    /// memory contents untouched.
    pub fn reset(&mut self, pc: u16) {
        self.regs = Registers::new();
        self.regs.pc = pc;
        self.halted = false;
        self.interrupts_enabled = false;
        self.bdos_output.clear();
    }

    /// Bulk-load a binary image into memory at `offset`.
    pub fn load_at(&mut self, offset: u16, data: &[u8]) -> Result<(), MemoryError> {
        self.mem.load(offset, data)
    }

    /// Attach the port bus IN/OUT dispatch through. Replaces whatever was
    /// previously attached (a fresh `Cpu` starts with a `NullPortBus`).
    pub fn attach_ports(&mut self, ports: impl PortBus + 'static) {
        self.ports = Box::new(ports);
    }

    /// Attach an instruction-level observer. Replaces whatever was
    /// previously attached.
    pub fn attach_tracer(&mut self, tracer: impl Tracer + 'static) {
        self.tracer = Some(Box::new(tracer));
    }

    /// `true` once `HLT` has executed and no interrupt has resumed the
    /// CPU since.
    #[inline]
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// The 8080's interrupt-enable flip-flop: set by `EI`, cleared by
    /// `DI` and by accepting an interrupt.
    #[inline]
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    /// Bytes the CP/M BDOS shim has written via console/string output
    /// calls so far.
    #[inline]
    pub fn bdos_output(&self) -> &[u8] {
        &self.bdos_output
    }

    /// Fetch-decode-execute one instruction at `regs.pc`. A no-op if the
    /// CPU is halted.
    pub fn step(&mut self) {
        if self.halted {
            return;
        }
        let pc_before = self.regs.pc;
        let mnemonic = dispatch::step(
            &mut self.regs,
            &mut self.mem,
            self.ports.as_mut(),
            &mut self.halted,
            &mut self.interrupts_enabled,
            &mut self.bdos_output,
        );
        if let Some(tracer) = self.tracer.as_mut() {
            let snapshot = RegisterSnapshot::from(&self.regs);
            tracer.on_instruction(mnemonic, pc_before, &snapshot);
        }
    }

    /// Run `step` until the CPU halts.
    pub fn run(&mut self) {
        while !self.halted {
            self.step();
        }
    }

    /// Deliver a vectored interrupt, as a device on the `PortBus` side
    /// would via its own scheduling. A no-op if interrupts are currently
    /// disabled. Pushes the current PC (low byte at `SP-2`, high byte at
    /// `SP-1`, matching `PUSH`'s encoding), jumps to `vector * 8`, clears
    /// the interrupt-enable flip-flop, and resumes a halted CPU exactly
    /// as real 8080 silicon does.
    pub fn interrupt(&mut self, vector: u8) {
        if !self.interrupts_enabled {
            return;
        }
        self.interrupts_enabled = false;
        self.halted = false;
        let pc = self.regs.pc;
        ops::pair::push(&mut self.regs, &mut self.mem, pc);
        self.regs.pc = (vector as u16) * 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::RecordingTracer;

    #[test]
    fn fresh_cpu_is_not_halted_and_interrupts_are_disabled() {
        let cpu = Cpu::new();
        assert!(!cpu.halted());
        assert!(!cpu.interrupts_enabled());
    }

    #[test]
    fn step_executes_one_instruction_and_advances_pc() {
        let mut cpu = Cpu::new();
        cpu.load_at(0x0000, &[0x3E, 0x07]).unwrap(); // MVI A,7
        cpu.step();
        assert_eq!(cpu.regs.a, 0x07);
        assert_eq!(cpu.regs.pc, 0x0002);
    }

    #[test]
    fn run_stops_at_hlt() {
        let mut cpu = Cpu::new();
        cpu.load_at(0x0000, &[0x3E, 0x01, 0x76, 0x3E, 0x02]).unwrap();
        cpu.run();
        assert!(cpu.halted());
        assert_eq!(cpu.regs.a, 0x01, "the MVI after HLT must never execute");
    }

    #[test]
    fn interrupt_is_ignored_when_disabled_then_honored_after_ei() {
        let mut cpu = Cpu::new();
        cpu.regs.sp = 0x2000;
        cpu.regs.pc = 0x0050;
        cpu.interrupt(1);
        assert_eq!(cpu.regs.pc, 0x0050, "interrupts start disabled");

        cpu.load_at(0x0050, &[0xFB]).unwrap(); // EI
        cpu.step();
        assert!(cpu.interrupts_enabled());
        cpu.interrupt(1);
        assert_eq!(cpu.regs.pc, 0x0008, "vector 1 -> address 8");
        assert!(!cpu.interrupts_enabled(), "accepting an interrupt clears IFF");
        assert_eq!(cpu.mem.read_word(cpu.regs.sp), 0x0051);
    }

    #[test]
    fn interrupt_resumes_a_halted_cpu() {
        let mut cpu = Cpu::new();
        cpu.regs.sp = 0x2000;
        cpu.load_at(0x0000, &[0xFB, 0x76]).unwrap(); // EI ; HLT
        cpu.step();
        cpu.step();
        assert!(cpu.halted());
        cpu.interrupt(2);
        assert!(!cpu.halted());
        assert_eq!(cpu.regs.pc, 0x0010);
    }

    #[test]
    fn attaching_a_tracer_does_not_disturb_execution() {
        let mut cpu = Cpu::new();
        cpu.attach_tracer(RecordingTracer::default());
        cpu.load_at(0x0000, &[0x00, 0x76]).unwrap(); // NOP ; HLT
        cpu.run();
        assert!(cpu.halted());
    }

    #[test]
    fn bdos_output_accumulates_across_steps() {
        let mut cpu = Cpu::new();
        cpu.regs.sp = 0x2000;
        cpu.regs.c = 2;
        cpu.regs.e = b'A';
        cpu.load_at(0x0000, &[0xCD, 0x05, 0x00]).unwrap(); // CALL 0x0005
        cpu.step();
        assert_eq!(cpu.bdos_output(), b"A");
    }
}
