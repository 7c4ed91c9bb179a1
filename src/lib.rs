#![doc = r#"
i8080 library crate: a cycle-count-agnostic, bit-exact Intel 8080
instruction-set interpreter.

This crate exposes the emulator core modules for use by the `i8080` binary
and by integration tests. It is deliberately silent on timing (no cycle
counting), on the Space Invaders device model (shift register, dip
switches, framebuffer), and on anything resembling a full-featured
command-line launcher — those are the concern of whatever embeds the core.

Modules:
- memory: flat 64 KiB byte-addressable address space
- flags: zero/sign/parity lookup table and the add/sub carry-flag rules
- registers: the register file (A,B,C,D,E,H,L,SP,PC) and condition flags
- ports: the `PortBus` seam IN/OUT dispatch through
- trace: the `Tracer` seam, an instruction-level observer
- cpu: operand resolution, per-family instruction semantics, the opcode
  dispatcher, the CP/M BDOS shim, and the `Cpu` façade that ties them
  together
"#]

pub mod cpu;
pub mod flags;
pub mod memory;
pub mod ports;
pub mod registers;
pub mod trace;

pub use cpu::Cpu;
pub use memory::{Memory, MemoryError};
pub use ports::PortBus;
pub use registers::Registers;
pub use trace::{RegisterSnapshot, Tracer};
