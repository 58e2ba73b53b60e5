//! Per-instruction disassembly trace
//!
//! The step driver hands this sink one record per instruction: the PC the
//! opcode was fetched from, its decode-table entry, and the register file
//! after execution. The sink re-reads the instruction bytes through the bus
//! (as the host's debugger would) and emits one line through the `log`
//! facade at TRACE level, so a filtered logger costs nothing per step.

use super::addressing::AddrMode;
use super::opcodes::Opcode;
use super::Registers;
use crate::bus::Bus;
use log::{log_enabled, trace, Level};

/// Called once per executed instruction.
pub(crate) fn trace_step<B: Bus>(bus: &mut B, pc: u16, opcode: &Opcode, reg: &Registers) {
    if !log_enabled!(Level::Trace) {
        return;
    }

    trace!(
        "{:<30} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
        disassemble(bus, pc, opcode),
        reg.a,
        reg.x,
        reg.y,
        reg.p.bits(),
        reg.s,
    );
}

/// Render one instruction at `pc` as a trace line fragment: address, raw
/// bytes, and the operand in canonical assembler syntax. Unofficial
/// mnemonics are marked with a `*`.
///
/// Reads go through the bus, so disassembling an instruction whose operand
/// bytes live in a memory-mapped register region is visible to the host.
pub fn disassemble<B: Bus>(bus: &mut B, pc: u16, opcode: &Opcode) -> String {
    let mut bytes = vec![bus.read(pc)];
    for i in 0..opcode.mode.operand_len() {
        bytes.push(bus.read(pc.wrapping_add(1 + i)));
    }

    let raw = bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");

    let marker = if opcode.mnemonic.is_unofficial() { "*" } else { " " };

    let line = format!(
        "{:04X}  {:<8} {}{} {}",
        pc,
        raw,
        marker,
        opcode.mnemonic.as_str(),
        operand_text(&bytes, pc, opcode.mode),
    );
    line.trim_end().to_string()
}

fn operand_text(bytes: &[u8], pc: u16, mode: AddrMode) -> String {
    let byte = |i: usize| bytes.get(i).copied().unwrap_or(0);
    let word = || (byte(2) as u16) << 8 | byte(1) as u16;

    match mode {
        AddrMode::Imp => String::new(),
        AddrMode::Acc => "A".to_string(),
        AddrMode::Imm => format!("#${:02X}", byte(1)),
        AddrMode::Zpg => format!("${:02X}", byte(1)),
        AddrMode::ZpgX => format!("${:02X},X", byte(1)),
        AddrMode::ZpgY => format!("${:02X},Y", byte(1)),
        AddrMode::Abs => format!("${:04X}", word()),
        AddrMode::AbsX => format!("${:04X},X", word()),
        AddrMode::AbsY => format!("${:04X},Y", word()),
        AddrMode::Ind => format!("(${:04X})", word()),
        AddrMode::IndX => format!("(${:02X},X)", byte(1)),
        AddrMode::IndY => format!("(${:02X}),Y", byte(1)),
        AddrMode::Rel => {
            // Branch target relative to the instruction after the branch.
            let target = pc.wrapping_add(2).wrapping_add(byte(1) as i8 as u16);
            format!("${target:04X}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatRam;
    use crate::cpu::OPCODES;

    #[test]
    fn test_disassemble_absolute_jump() {
        let mut ram = FlatRam::new();
        ram.load(0xC000, &[0x4C, 0xF5, 0xC5]);

        let line = disassemble(&mut ram, 0xC000, &OPCODES[0x4C]);
        assert_eq!(line, "C000  4C F5 C5  JMP $C5F5");
    }

    #[test]
    fn test_disassemble_immediate() {
        let mut ram = FlatRam::new();
        ram.load(0x8000, &[0xA9, 0x42]);

        let line = disassemble(&mut ram, 0x8000, &OPCODES[0xA9]);
        assert_eq!(line, "8000  A9 42     LDA #$42");
    }

    #[test]
    fn test_disassemble_branch_target() {
        let mut ram = FlatRam::new();
        // BNE +4 at $01FD: target = $01FF + 4 = $0203.
        ram.load(0x01FD, &[0xD0, 0x04]);

        let line = disassemble(&mut ram, 0x01FD, &OPCODES[0xD0]);
        assert_eq!(line, "01FD  D0 04     BNE $0203");
    }

    #[test]
    fn test_disassemble_marks_unofficial() {
        let mut ram = FlatRam::new();
        ram.load(0x8000, &[0xA7, 0x10]);

        let line = disassemble(&mut ram, 0x8000, &OPCODES[0xA7]);
        assert_eq!(line, "8000  A7 10    *LAX $10");
    }

    #[test]
    fn test_disassemble_accumulator_mode() {
        let mut ram = FlatRam::new();
        ram.load(0x8000, &[0x0A]);

        let line = disassemble(&mut ram, 0x8000, &OPCODES[0x0A]);
        assert_eq!(line, "8000  0A        ASL A");
    }

    #[test]
    fn test_disassemble_implied_has_no_operand() {
        let mut ram = FlatRam::new();
        ram.load(0x8000, &[0xEA]);

        let line = disassemble(&mut ram, 0x8000, &OPCODES[0xEA]);
        assert_eq!(line, "8000  EA        NOP");
    }
}
