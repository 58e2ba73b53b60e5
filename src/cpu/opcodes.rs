//! Decode table: one entry per opcode byte
//!
//! Every byte 0x00..=0xFF decodes to something. Official instructions carry
//! their datasheet cycle counts; unofficial ones use the timings measured on
//! NMOS silicon; the twelve JAM bytes halt the CPU and cost nothing because
//! the CPU never leaves them.

use super::addressing::AddrMode;

/// Operation kind, covering the 56 official mnemonics and the unofficial
/// opcodes found on NMOS 6502s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    // Official
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    // Unofficial
    Alr, Anc, Ane, Arr, Dcp, Isc, Jam, Las, Lax, Lxa, Rla, Rra, Sax, Sbx,
    Sha, Shx, Shy, Slo, Sre, Tas, Usb,
}

impl Mnemonic {
    /// Assembler spelling, used by the trace sink.
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
            Mnemonic::Alr => "ALR",
            Mnemonic::Anc => "ANC",
            Mnemonic::Ane => "ANE",
            Mnemonic::Arr => "ARR",
            Mnemonic::Dcp => "DCP",
            Mnemonic::Isc => "ISC",
            Mnemonic::Jam => "JAM",
            Mnemonic::Las => "LAS",
            Mnemonic::Lax => "LAX",
            Mnemonic::Lxa => "LXA",
            Mnemonic::Rla => "RLA",
            Mnemonic::Rra => "RRA",
            Mnemonic::Sax => "SAX",
            Mnemonic::Sbx => "SBX",
            Mnemonic::Sha => "SHA",
            Mnemonic::Shx => "SHX",
            Mnemonic::Shy => "SHY",
            Mnemonic::Slo => "SLO",
            Mnemonic::Sre => "SRE",
            Mnemonic::Tas => "TAS",
            Mnemonic::Usb => "USB",
        }
    }

    /// True for opcodes absent from the official datasheet.
    pub fn is_unofficial(self) -> bool {
        matches!(
            self,
            Mnemonic::Alr
                | Mnemonic::Anc
                | Mnemonic::Ane
                | Mnemonic::Arr
                | Mnemonic::Dcp
                | Mnemonic::Isc
                | Mnemonic::Jam
                | Mnemonic::Las
                | Mnemonic::Lax
                | Mnemonic::Lxa
                | Mnemonic::Rla
                | Mnemonic::Rra
                | Mnemonic::Sax
                | Mnemonic::Sbx
                | Mnemonic::Sha
                | Mnemonic::Shx
                | Mnemonic::Shy
                | Mnemonic::Slo
                | Mnemonic::Sre
                | Mnemonic::Tas
                | Mnemonic::Usb
        )
    }
}

/// One decode-table entry.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
    /// Base cycle cost before page-cross and branch penalties.
    pub cycles: u8,
    /// Whether an indexed page crossing costs an extra cycle. Stores and
    /// read-modify-write forms always pay the worst case and carry it in
    /// `cycles` instead.
    pub page_penalty: bool,
}

const fn op(mnemonic: Mnemonic, mode: AddrMode, cycles: u8) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        cycles,
        page_penalty: false,
    }
}

/// Entry that pays one extra cycle when the effective address crosses a page.
const fn opx(mnemonic: Mnemonic, mode: AddrMode, cycles: u8) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        cycles,
        page_penalty: true,
    }
}

/// The full decode table, indexed by opcode byte.
pub static OPCODES: [Opcode; 256] = {
    use self::Mnemonic::*;
    use super::addressing::AddrMode::*;
    [
        // 0x00 - 0x0F
        op(Brk, Imp, 7), op(Ora, IndX, 6), op(Jam, Imp, 0), op(Slo, IndX, 8),
        op(Nop, Zpg, 3), op(Ora, Zpg, 3), op(Asl, Zpg, 5), op(Slo, Zpg, 5),
        op(Php, Imp, 3), op(Ora, Imm, 2), op(Asl, Acc, 2), op(Anc, Imm, 2),
        op(Nop, Abs, 4), op(Ora, Abs, 4), op(Asl, Abs, 6), op(Slo, Abs, 6),
        // 0x10 - 0x1F
        op(Bpl, Rel, 2), opx(Ora, IndY, 5), op(Jam, Imp, 0), op(Slo, IndY, 8),
        op(Nop, ZpgX, 4), op(Ora, ZpgX, 4), op(Asl, ZpgX, 6), op(Slo, ZpgX, 6),
        op(Clc, Imp, 2), opx(Ora, AbsY, 4), op(Nop, Imp, 2), op(Slo, AbsY, 7),
        opx(Nop, AbsX, 4), opx(Ora, AbsX, 4), op(Asl, AbsX, 7), op(Slo, AbsX, 7),
        // 0x20 - 0x2F
        op(Jsr, Abs, 6), op(And, IndX, 6), op(Jam, Imp, 0), op(Rla, IndX, 8),
        op(Bit, Zpg, 3), op(And, Zpg, 3), op(Rol, Zpg, 5), op(Rla, Zpg, 5),
        op(Plp, Imp, 4), op(And, Imm, 2), op(Rol, Acc, 2), op(Anc, Imm, 2),
        op(Bit, Abs, 4), op(And, Abs, 4), op(Rol, Abs, 6), op(Rla, Abs, 6),
        // 0x30 - 0x3F
        op(Bmi, Rel, 2), opx(And, IndY, 5), op(Jam, Imp, 0), op(Rla, IndY, 8),
        op(Nop, ZpgX, 4), op(And, ZpgX, 4), op(Rol, ZpgX, 6), op(Rla, ZpgX, 6),
        op(Sec, Imp, 2), opx(And, AbsY, 4), op(Nop, Imp, 2), op(Rla, AbsY, 7),
        opx(Nop, AbsX, 4), opx(And, AbsX, 4), op(Rol, AbsX, 7), op(Rla, AbsX, 7),
        // 0x40 - 0x4F
        op(Rti, Imp, 6), op(Eor, IndX, 6), op(Jam, Imp, 0), op(Sre, IndX, 8),
        op(Nop, Zpg, 3), op(Eor, Zpg, 3), op(Lsr, Zpg, 5), op(Sre, Zpg, 5),
        op(Pha, Imp, 3), op(Eor, Imm, 2), op(Lsr, Acc, 2), op(Alr, Imm, 2),
        op(Jmp, Abs, 3), op(Eor, Abs, 4), op(Lsr, Abs, 6), op(Sre, Abs, 6),
        // 0x50 - 0x5F
        op(Bvc, Rel, 2), opx(Eor, IndY, 5), op(Jam, Imp, 0), op(Sre, IndY, 8),
        op(Nop, ZpgX, 4), op(Eor, ZpgX, 4), op(Lsr, ZpgX, 6), op(Sre, ZpgX, 6),
        op(Cli, Imp, 2), opx(Eor, AbsY, 4), op(Nop, Imp, 2), op(Sre, AbsY, 7),
        opx(Nop, AbsX, 4), opx(Eor, AbsX, 4), op(Lsr, AbsX, 7), op(Sre, AbsX, 7),
        // 0x60 - 0x6F
        op(Rts, Imp, 6), op(Adc, IndX, 6), op(Jam, Imp, 0), op(Rra, IndX, 8),
        op(Nop, Zpg, 3), op(Adc, Zpg, 3), op(Ror, Zpg, 5), op(Rra, Zpg, 5),
        op(Pla, Imp, 4), op(Adc, Imm, 2), op(Ror, Acc, 2), op(Arr, Imm, 2),
        op(Jmp, Ind, 5), op(Adc, Abs, 4), op(Ror, Abs, 6), op(Rra, Abs, 6),
        // 0x70 - 0x7F
        op(Bvs, Rel, 2), opx(Adc, IndY, 5), op(Jam, Imp, 0), op(Rra, IndY, 8),
        op(Nop, ZpgX, 4), op(Adc, ZpgX, 4), op(Ror, ZpgX, 6), op(Rra, ZpgX, 6),
        op(Sei, Imp, 2), opx(Adc, AbsY, 4), op(Nop, Imp, 2), op(Rra, AbsY, 7),
        opx(Nop, AbsX, 4), opx(Adc, AbsX, 4), op(Ror, AbsX, 7), op(Rra, AbsX, 7),
        // 0x80 - 0x8F
        op(Nop, Imm, 2), op(Sta, IndX, 6), op(Nop, Imm, 2), op(Sax, IndX, 6),
        op(Sty, Zpg, 3), op(Sta, Zpg, 3), op(Stx, Zpg, 3), op(Sax, Zpg, 3),
        op(Dey, Imp, 2), op(Nop, Imm, 2), op(Txa, Imp, 2), op(Ane, Imm, 2),
        op(Sty, Abs, 4), op(Sta, Abs, 4), op(Stx, Abs, 4), op(Sax, Abs, 4),
        // 0x90 - 0x9F
        op(Bcc, Rel, 2), op(Sta, IndY, 6), op(Jam, Imp, 0), op(Sha, IndY, 6),
        op(Sty, ZpgX, 4), op(Sta, ZpgX, 4), op(Stx, ZpgY, 4), op(Sax, ZpgY, 4),
        op(Tya, Imp, 2), op(Sta, AbsY, 5), op(Txs, Imp, 2), op(Tas, AbsY, 5),
        op(Shy, AbsX, 5), op(Sta, AbsX, 5), op(Shx, AbsY, 5), op(Sha, AbsY, 5),
        // 0xA0 - 0xAF
        op(Ldy, Imm, 2), op(Lda, IndX, 6), op(Ldx, Imm, 2), op(Lax, IndX, 6),
        op(Ldy, Zpg, 3), op(Lda, Zpg, 3), op(Ldx, Zpg, 3), op(Lax, Zpg, 3),
        op(Tay, Imp, 2), op(Lda, Imm, 2), op(Tax, Imp, 2), op(Lxa, Imm, 2),
        op(Ldy, Abs, 4), op(Lda, Abs, 4), op(Ldx, Abs, 4), op(Lax, Abs, 4),
        // 0xB0 - 0xBF
        op(Bcs, Rel, 2), opx(Lda, IndY, 5), op(Jam, Imp, 0), opx(Lax, IndY, 5),
        op(Ldy, ZpgX, 4), op(Lda, ZpgX, 4), op(Ldx, ZpgY, 4), op(Lax, ZpgY, 4),
        op(Clv, Imp, 2), opx(Lda, AbsY, 4), op(Tsx, Imp, 2), opx(Las, AbsY, 4),
        opx(Ldy, AbsX, 4), opx(Lda, AbsX, 4), opx(Ldx, AbsY, 4), opx(Lax, AbsY, 4),
        // 0xC0 - 0xCF
        op(Cpy, Imm, 2), op(Cmp, IndX, 6), op(Nop, Imm, 2), op(Dcp, IndX, 8),
        op(Cpy, Zpg, 3), op(Cmp, Zpg, 3), op(Dec, Zpg, 5), op(Dcp, Zpg, 5),
        op(Iny, Imp, 2), op(Cmp, Imm, 2), op(Dex, Imp, 2), op(Sbx, Imm, 2),
        op(Cpy, Abs, 4), op(Cmp, Abs, 4), op(Dec, Abs, 6), op(Dcp, Abs, 6),
        // 0xD0 - 0xDF
        op(Bne, Rel, 2), opx(Cmp, IndY, 5), op(Jam, Imp, 0), op(Dcp, IndY, 8),
        op(Nop, ZpgX, 4), op(Cmp, ZpgX, 4), op(Dec, ZpgX, 6), op(Dcp, ZpgX, 6),
        op(Cld, Imp, 2), opx(Cmp, AbsY, 4), op(Nop, Imp, 2), op(Dcp, AbsY, 7),
        opx(Nop, AbsX, 4), opx(Cmp, AbsX, 4), op(Dec, AbsX, 7), op(Dcp, AbsX, 7),
        // 0xE0 - 0xEF
        op(Cpx, Imm, 2), op(Sbc, IndX, 6), op(Nop, Imm, 2), op(Isc, IndX, 8),
        op(Cpx, Zpg, 3), op(Sbc, Zpg, 3), op(Inc, Zpg, 5), op(Isc, Zpg, 5),
        op(Inx, Imp, 2), op(Sbc, Imm, 2), op(Nop, Imp, 2), op(Usb, Imm, 2),
        op(Cpx, Abs, 4), op(Sbc, Abs, 4), op(Inc, Abs, 6), op(Isc, Abs, 6),
        // 0xF0 - 0xFF
        op(Beq, Rel, 2), opx(Sbc, IndY, 5), op(Jam, Imp, 0), op(Isc, IndY, 8),
        op(Nop, ZpgX, 4), op(Sbc, ZpgX, 4), op(Inc, ZpgX, 6), op(Isc, ZpgX, 6),
        op(Sed, Imp, 2), opx(Sbc, AbsY, 4), op(Nop, Imp, 2), op(Isc, AbsY, 7),
        opx(Nop, AbsX, 4), opx(Sbc, AbsX, 4), op(Inc, AbsX, 7), op(Isc, AbsX, 7),
    ]
};
