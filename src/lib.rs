//! RP2A03 - the NES 6502 CPU core
//!
//! An instruction-level emulator of the MOS 6502 as found in the NES. The
//! crate provides the execution core only: the register file, the full
//! 256-entry decode table (official and unofficial opcodes), the addressing
//! mode resolvers, interrupt entry, and a disassembly trace. The rest of the
//! console talks to it through the [`bus::Bus`] contract.

pub mod bus;
pub mod cpu;
pub mod rom_loader;

pub use bus::{Bus, FlatRam};
pub use cpu::{Cpu, Registers, StatusFlags};
