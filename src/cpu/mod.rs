//! # 6502 CPU Emulation for the NES
//!
//! This module implements the Ricoh RP2A03 CPU core, the 6502 variant used
//! in the NES. One [`Cpu::step`] executes one full instruction against a
//! host-supplied [`Bus`] and returns its cycle cost.
//!
//! ## Key Features
//! - Full implementation of all 56 official 6502 instructions
//! - Every unofficial opcode decodes and executes; the JAM group halts
//! - Per-instruction cycle counts with page-cross and branch penalties
//! - Proper interrupt handling (NMI, IRQ, BRK) polled at step boundaries
//! - Per-instruction disassembly trace through the `log` facade

mod addressing;
mod mem;
mod opcodes;
mod ops;
mod status_flags;
mod trace;
mod unofficial;

pub use self::addressing::{AddrMode, Operand};
pub use self::opcodes::{Mnemonic, Opcode, OPCODES};
pub use self::status_flags::StatusFlags;
pub use self::trace::disassemble;

use crate::bus::Bus;
use log::debug;

/// NMI handler pointer.
const NMI_VECTOR: u16 = 0xFFFA;
/// Loaded into PC on reset.
const RESET_VECTOR: u16 = 0xFFFC;
/// Shared by hardware IRQ and software BRK.
pub(crate) const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycle cost of taking an NMI or IRQ.
const INTERRUPT_CYCLES: u32 = 7;

/// # 6502 CPU Registers
///
/// The 6502 has three general-purpose 8-bit registers (A, X, Y),
/// a program counter (PC), stack pointer (S), and a status register (P).
///
/// ## Register Descriptions:
/// - `a`: Accumulator - Main register for arithmetic and logic operations
/// - `x`: X Index - General purpose register, often used for counters/offsets
/// - `y`: Y Index - General purpose register, similar to X but with some addressing mode differences
/// - `s`: Stack Pointer - 8-bit register addressing the hardware stack (page 1: 0x0100-0x01FF)
/// - `p`: Status Register - 8-bit register containing processor flags (see StatusFlags)
/// - `pc`: Program Counter - 16-bit register pointing to the next instruction to execute
#[derive(Debug, Default, Clone, Copy)]
pub struct Registers {
    /// Accumulator
    pub a: u8,
    /// X index register
    pub x: u8,
    /// Y index register
    pub y: u8,
    /// Stack pointer (low byte of an address in page 1)
    pub s: u8,
    /// Program counter
    pub pc: u16,
    /// Status register
    pub p: StatusFlags,
}

/// # 6502 CPU Emulator
///
/// Owns the register file and the per-instruction execution state. The bus
/// is borrowed per call, never owned: the host wires memory and devices and
/// drives interrupt lines between steps.
#[derive(Debug)]
pub struct Cpu {
    /// CPU registers
    pub reg: Registers,
    /// Total cycles executed since reset
    pub cycles: u64,
    /// Operand of the instruction currently executing
    operand: Operand,
    /// Whether the last address resolution crossed a page
    page_crossed: bool,
    /// Extra cycles charged by a taken branch this step
    branch_cycles: u32,
    /// Whether an NMI edge is waiting to be serviced
    nmi_pending: bool,
    /// Level of the IRQ line as last set by the host
    irq_line: bool,
    /// Set by a JAM opcode; cleared only by reset
    jammed: bool,
}

impl Cpu {
    /// Creates a new CPU in its power-on state. PC is left at zero until
    /// [`Cpu::reset`] fetches the reset vector.
    pub fn new() -> Self {
        Cpu {
            reg: Registers {
                a: 0,
                x: 0,
                y: 0,
                s: 0xFD,
                pc: 0,
                p: StatusFlags::UNUSED | StatusFlags::INTERRUPT_DISABLE,
            },
            cycles: 0,
            operand: Operand::None,
            page_crossed: false,
            branch_cycles: 0,
            nmi_pending: false,
            irq_line: false,
            jammed: false,
        }
    }

    /// Resets the CPU to its initial state.
    ///
    /// Hardware reset behaviour: A, X and Y cleared, S at 0xFD, P at 0x24
    /// (interrupt disable plus the always-set bit 5), PC loaded from the
    /// reset vector at 0xFFFC. Pending interrupts and a JAM latch are
    /// cleared.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.reg = Registers {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFD,
            pc: bus.read_word(RESET_VECTOR),
            p: StatusFlags::UNUSED | StatusFlags::INTERRUPT_DISABLE,
        };
        self.cycles = 0;
        self.operand = Operand::None;
        self.page_crossed = false;
        self.branch_cycles = 0;
        self.nmi_pending = false;
        self.irq_line = false;
        self.jammed = false;

        debug!("CPU reset, PC={:04X}", self.reg.pc);
    }

    /// Signals a non-maskable interrupt. NMI is edge-triggered: one call
    /// queues exactly one interrupt, taken at the next step boundary.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Drives the level-triggered IRQ line. While asserted and the I flag
    /// is clear, the CPU takes the interrupt at every step boundary; the
    /// device is expected to deassert once serviced.
    pub fn set_irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    /// Asserts the IRQ line.
    pub fn irq(&mut self) {
        self.set_irq(true);
    }

    /// Whether a JAM opcode has halted the CPU. Only reset recovers.
    pub fn is_jammed(&self) -> bool {
        self.jammed
    }

    /// Executes one instruction (or services one pending interrupt) and
    /// returns its cycle cost.
    ///
    /// The sequence per step: poll interrupt lines, fetch the opcode,
    /// decode it through the table, resolve the addressing mode (which
    /// consumes operand bytes and advances PC), run the operation body,
    /// hand the trace sink one record, and account cycles. A jammed CPU
    /// returns 0 until reset.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.jammed {
            return 0;
        }

        // Interrupts are observed only between instructions. NMI wins over
        // IRQ, and IRQ is masked by the I flag.
        if self.nmi_pending {
            self.nmi_pending = false;
            self.interrupt(bus, NMI_VECTOR, false);
            self.cycles += INTERRUPT_CYCLES as u64;
            return INTERRUPT_CYCLES;
        }
        if self.irq_line && !self.reg.p.is_interrupt() {
            self.interrupt(bus, IRQ_VECTOR, false);
            self.cycles += INTERRUPT_CYCLES as u64;
            return INTERRUPT_CYCLES;
        }

        let pc = self.reg.pc;
        let code = self.fetch(bus);
        let opcode = &OPCODES[code as usize];

        self.page_crossed = false;
        self.branch_cycles = 0;
        self.operand = self.resolve(bus, opcode.mode);
        self.execute(bus, opcode.mnemonic);

        trace::trace_step(bus, pc, opcode, &self.reg);

        let mut total = opcode.cycles as u32 + self.branch_cycles;
        if opcode.page_penalty && self.page_crossed {
            total += 1;
        }
        self.cycles += total as u64;
        total
    }

    /// Common interrupt entry: push the return address and status, mask
    /// further IRQs, and vector. BRK pushes with B set and skips its
    /// padding byte; hardware interrupts push with B clear.
    pub(crate) fn interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16, software: bool) {
        let return_addr = if software {
            self.reg.pc.wrapping_add(1)
        } else {
            self.reg.pc
        };

        self.push_word(bus, return_addr);
        self.push(bus, self.reg.p.for_push(software).bits());
        self.reg.p.insert(StatusFlags::INTERRUPT_DISABLE);
        self.reg.pc = bus.read_word(vector);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatRam;

    fn system_with(base: u16, program: &[u8]) -> (Cpu, FlatRam) {
        let mut ram = FlatRam::new();
        ram.load(base, program);
        ram.set_reset_vector(base);
        let mut cpu = Cpu::new();
        cpu.reset(&mut ram);
        (cpu, ram)
    }

    #[test]
    fn test_reset_state() {
        let (cpu, _ram) = system_with(0x8000, &[0xEA]);

        assert_eq!(cpu.reg.a, 0);
        assert_eq!(cpu.reg.x, 0);
        assert_eq!(cpu.reg.y, 0);
        assert_eq!(cpu.reg.s, 0xFD);
        assert_eq!(cpu.reg.p.bits(), 0x24);
        assert_eq!(cpu.reg.pc, 0x8000);
    }

    #[test]
    fn test_step_returns_base_cycles() {
        let (mut cpu, mut ram) = system_with(0x8000, &[0xEA, 0xA9, 0x10]);

        assert_eq!(cpu.step(&mut ram), 2); // NOP
        assert_eq!(cpu.step(&mut ram), 2); // LDA #$10
        assert_eq!(cpu.reg.a, 0x10);
        assert_eq!(cpu.cycles, 4);
    }

    #[test]
    fn test_page_cross_penalty_charged_once() {
        // LDA $80FF,X with X=1 crosses into $8100.
        let (mut cpu, mut ram) = system_with(0x8000, &[0xBD, 0xFF, 0x80]);
        cpu.reg.x = 0x01;
        ram.write(0x8100, 0x55);

        assert_eq!(cpu.step(&mut ram), 5);
        assert_eq!(cpu.reg.a, 0x55);
    }

    #[test]
    fn test_store_never_pays_cross_penalty() {
        // STA $80FF,X with X=1: fixed 5 cycles.
        let (mut cpu, mut ram) = system_with(0x8000, &[0x9D, 0xFF, 0x80]);
        cpu.reg.x = 0x01;
        cpu.reg.a = 0x77;

        assert_eq!(cpu.step(&mut ram), 5);
        assert_eq!(ram.peek(0x8100), 0x77);
    }

    #[test]
    fn test_jam_latches_until_reset() {
        let (mut cpu, mut ram) = system_with(0x8000, &[0x02, 0xEA]);

        assert_eq!(cpu.step(&mut ram), 0);
        assert!(cpu.is_jammed());
        assert_eq!(cpu.step(&mut ram), 0);
        assert_eq!(cpu.step(&mut ram), 0);

        cpu.reset(&mut ram);
        assert!(!cpu.is_jammed());
        // Back at the vector, where the same byte would jam it again.
        assert_eq!(cpu.reg.pc, 0x8000);
    }

    #[test]
    fn test_nmi_taken_before_instruction() {
        let (mut cpu, mut ram) = system_with(0x8000, &[0xEA]);
        ram.write(0xFFFA, 0x00);
        ram.write(0xFFFB, 0x90);
        cpu.nmi();

        let cycles = cpu.step(&mut ram);
        assert_eq!(cycles, 7);
        assert_eq!(cpu.reg.pc, 0x9000);
        assert!(cpu.reg.p.is_interrupt());

        // Return address points at the interrupted instruction, and the
        // pushed status has B clear but bit 5 set.
        assert_eq!(ram.peek(0x01FD), 0x80);
        assert_eq!(ram.peek(0x01FC), 0x00);
        assert_eq!(ram.peek(0x01FB) & 0x30, 0x20);
    }

    #[test]
    fn test_irq_masked_by_interrupt_disable() {
        let (mut cpu, mut ram) = system_with(0x8000, &[0xEA, 0x58, 0xEA]);
        ram.write(0xFFFE, 0x00);
        ram.write(0xFFFF, 0xA0);
        cpu.irq();

        // P starts with I set, so the IRQ is held off.
        cpu.step(&mut ram);
        assert_eq!(cpu.reg.pc, 0x8001);

        // CLI unmasks it; the next boundary takes the interrupt.
        cpu.step(&mut ram);
        let cycles = cpu.step(&mut ram);
        assert_eq!(cycles, 7);
        assert_eq!(cpu.reg.pc, 0xA000);
    }

    #[test]
    fn test_nmi_wins_over_irq() {
        let (mut cpu, mut ram) = system_with(0x8000, &[0x58, 0xEA]);
        ram.write(0xFFFA, 0x00);
        ram.write(0xFFFB, 0x90);
        ram.write(0xFFFE, 0x00);
        ram.write(0xFFFF, 0xA0);

        cpu.step(&mut ram); // CLI
        cpu.nmi();
        cpu.irq();

        cpu.step(&mut ram);
        assert_eq!(cpu.reg.pc, 0x9000);
    }

    #[test]
    fn test_brk_pushes_padded_return_and_vectors() {
        let (mut cpu, mut ram) = system_with(0x8000, &[0x00, 0xFF, 0xEA]);
        ram.write(0xFFFE, 0x00);
        ram.write(0xFFFF, 0xC0);

        let cycles = cpu.step(&mut ram);
        assert_eq!(cycles, 7);
        assert_eq!(cpu.reg.pc, 0xC000);
        assert!(cpu.reg.p.is_interrupt());

        // Return address skips the padding byte at $8001.
        assert_eq!(ram.peek(0x01FD), 0x80);
        assert_eq!(ram.peek(0x01FC), 0x02);
        // Pushed status has both B and bit 5 set.
        assert_eq!(ram.peek(0x01FB) & 0x30, 0x30);
    }
}
