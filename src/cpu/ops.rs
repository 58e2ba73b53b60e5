//! Official instruction semantics
//!
//! Every body reads its data through the resolved operand, mutates register
//! or memory state, and derives flags. Arithmetic feeds raw 9-bit results
//! into the wide flag setters; compares and right shifts set carry
//! explicitly because their carry is not bit 8 of a sum.

use super::addressing::Operand;
use super::opcodes::Mnemonic;
use super::{Cpu, StatusFlags};
use crate::bus::Bus;

impl Cpu {
    /// Dispatch one decoded operation.
    pub(crate) fn execute<B: Bus>(&mut self, bus: &mut B, mnemonic: Mnemonic) {
        match mnemonic {
            Mnemonic::Adc => self.adc(bus),
            Mnemonic::And => self.and(bus),
            Mnemonic::Asl => self.asl(bus),
            Mnemonic::Bcc => self.branch(bus, !self.reg.p.is_carry()),
            Mnemonic::Bcs => self.branch(bus, self.reg.p.is_carry()),
            Mnemonic::Beq => self.branch(bus, self.reg.p.is_zero()),
            Mnemonic::Bit => self.bit(bus),
            Mnemonic::Bmi => self.branch(bus, self.reg.p.is_negative()),
            Mnemonic::Bne => self.branch(bus, !self.reg.p.is_zero()),
            Mnemonic::Bpl => self.branch(bus, !self.reg.p.is_negative()),
            Mnemonic::Brk => self.brk(bus),
            Mnemonic::Bvc => self.branch(bus, !self.reg.p.is_overflow()),
            Mnemonic::Bvs => self.branch(bus, self.reg.p.is_overflow()),
            Mnemonic::Clc => self.reg.p.remove(StatusFlags::CARRY),
            Mnemonic::Cld => self.reg.p.remove(StatusFlags::DECIMAL),
            Mnemonic::Cli => self.reg.p.remove(StatusFlags::INTERRUPT_DISABLE),
            Mnemonic::Clv => self.reg.p.remove(StatusFlags::OVERFLOW),
            Mnemonic::Cmp => self.cmp(bus),
            Mnemonic::Cpx => self.cpx(bus),
            Mnemonic::Cpy => self.cpy(bus),
            Mnemonic::Dec => self.dec(bus),
            Mnemonic::Dex => self.dex(),
            Mnemonic::Dey => self.dey(),
            Mnemonic::Eor => self.eor(bus),
            Mnemonic::Inc => self.inc(bus),
            Mnemonic::Inx => self.inx(),
            Mnemonic::Iny => self.iny(),
            Mnemonic::Jmp => self.jmp(),
            Mnemonic::Jsr => self.jsr(bus),
            Mnemonic::Lda => self.lda(bus),
            Mnemonic::Ldx => self.ldx(bus),
            Mnemonic::Ldy => self.ldy(bus),
            Mnemonic::Lsr => self.lsr(bus),
            Mnemonic::Nop => {}
            Mnemonic::Ora => self.ora(bus),
            Mnemonic::Pha => self.pha(bus),
            Mnemonic::Php => self.php(bus),
            Mnemonic::Pla => self.pla(bus),
            Mnemonic::Plp => self.plp(bus),
            Mnemonic::Rol => self.rol(bus),
            Mnemonic::Ror => self.ror(bus),
            Mnemonic::Rti => self.rti(bus),
            Mnemonic::Rts => self.rts(bus),
            Mnemonic::Sbc => self.sbc(bus),
            Mnemonic::Sec => self.reg.p.insert(StatusFlags::CARRY),
            Mnemonic::Sed => self.reg.p.insert(StatusFlags::DECIMAL),
            Mnemonic::Sei => self.reg.p.insert(StatusFlags::INTERRUPT_DISABLE),
            Mnemonic::Sta => self.write_operand(bus, self.reg.a),
            Mnemonic::Stx => self.write_operand(bus, self.reg.x),
            Mnemonic::Sty => self.write_operand(bus, self.reg.y),
            Mnemonic::Tax => self.tax(),
            Mnemonic::Tay => self.tay(),
            Mnemonic::Tsx => self.tsx(),
            Mnemonic::Txa => self.txa(),
            Mnemonic::Txs => self.reg.s = self.reg.x,
            Mnemonic::Tya => self.tya(),

            Mnemonic::Alr => self.alr(bus),
            Mnemonic::Anc => self.anc(bus),
            Mnemonic::Ane => self.ane(bus),
            Mnemonic::Arr => self.arr(bus),
            Mnemonic::Dcp => self.dcp(bus),
            Mnemonic::Isc => self.isc(bus),
            Mnemonic::Jam => self.jam(),
            Mnemonic::Las => self.las(bus),
            Mnemonic::Lax => self.lax(bus),
            Mnemonic::Lxa => self.lxa(bus),
            Mnemonic::Rla => self.rla(bus),
            Mnemonic::Rra => self.rra(bus),
            Mnemonic::Sax => self.sax(bus),
            Mnemonic::Sbx => self.sbx(bus),
            Mnemonic::Sha => self.sha(bus),
            Mnemonic::Shx => self.shx(bus),
            Mnemonic::Shy => self.shy(bus),
            Mnemonic::Slo => self.slo(bus),
            Mnemonic::Sre => self.sre(bus),
            Mnemonic::Tas => self.tas(bus),
            Mnemonic::Usb => self.sbc(bus),
        }
    }

    // ------------------------------------------------------------------
    // Arithmetic
    // ------------------------------------------------------------------

    /// Add `value + C` into A as a 9-bit sum. C is bit 8 of the sum and V
    /// is set on signed overflow. The NES variant has decimal mode fused
    /// off, so D is ignored here.
    pub(crate) fn add_to_a(&mut self, value: u8) {
        let sum = self.reg.a as u16 + value as u16 + self.reg.p.is_carry() as u16;
        let result = sum as u8;

        self.reg.p.set_carry_from(sum);
        self.reg.p.set(
            StatusFlags::OVERFLOW,
            (self.reg.a ^ result) & (value ^ result) & 0x80 != 0,
        );
        self.reg.p.set_nz(result);

        self.reg.a = result;
    }

    /// ADC - Add Memory to Accumulator with Carry
    fn adc<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        self.add_to_a(value);
    }

    /// SBC - Subtract Memory from Accumulator with Borrow
    ///
    /// `A - M - (1 - C)` is the same 9-bit addition with M inverted.
    pub(crate) fn sbc<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        self.add_to_a(!value);
    }

    /// Shared body of CMP/CPX/CPY: compute `reg - M` and set C when the
    /// register is at least M, Z on equality, N from bit 7 of the
    /// difference.
    pub(crate) fn compare(&mut self, reg: u8, value: u8) {
        let diff = (reg as u16).wrapping_sub(value as u16);

        self.reg.p.set(StatusFlags::CARRY, reg >= value);
        self.reg.p.set(StatusFlags::ZERO, reg == value);
        self.reg.p.set_negative_from(diff);
    }

    /// CMP - Compare Memory with Accumulator
    fn cmp<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        self.compare(self.reg.a, value);
    }

    /// CPX - Compare Memory and Index X
    fn cpx<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        self.compare(self.reg.x, value);
    }

    /// CPY - Compare Memory and Index Y
    fn cpy<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        self.compare(self.reg.y, value);
    }

    // ------------------------------------------------------------------
    // Logic
    // ------------------------------------------------------------------

    /// AND - AND Memory with Accumulator
    fn and<B: Bus>(&mut self, bus: &mut B) {
        self.reg.a &= self.read_operand(bus);
        self.reg.p.set_nz(self.reg.a);
    }

    /// ORA - OR Memory with Accumulator
    fn ora<B: Bus>(&mut self, bus: &mut B) {
        self.reg.a |= self.read_operand(bus);
        self.reg.p.set_nz(self.reg.a);
    }

    /// EOR - Exclusive-OR Memory with Accumulator
    fn eor<B: Bus>(&mut self, bus: &mut B) {
        self.reg.a ^= self.read_operand(bus);
        self.reg.p.set_nz(self.reg.a);
    }

    /// BIT - Test Bits in Memory with Accumulator
    ///
    /// N and V come from bits 7 and 6 of the operand, Z from `A AND M`.
    /// A itself is not modified.
    fn bit<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);

        self.reg.p.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
        self.reg.p.set(StatusFlags::OVERFLOW, value & 0x40 != 0);
        self.reg.p.set_zero_from((value & self.reg.a) as u16);
    }

    // ------------------------------------------------------------------
    // Shifts and rotates (memory or accumulator, per addressing mode)
    // ------------------------------------------------------------------

    /// ASL - Shift Left One Bit
    fn asl<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        let result = value << 1;

        self.reg.p.set(StatusFlags::CARRY, value & 0x80 != 0);
        self.reg.p.set_nz(result);

        self.write_operand(bus, result);
    }

    /// LSR - Shift One Bit Right
    ///
    /// C takes bit 0 of the input and N is always cleared.
    fn lsr<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        let result = value >> 1;

        self.reg.p.set(StatusFlags::CARRY, value & 0x01 != 0);
        self.reg.p.set_nz(result);

        self.write_operand(bus, result);
    }

    /// ROL - Rotate One Bit Left through Carry
    fn rol<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        let result = (value << 1) | self.reg.p.is_carry() as u8;

        self.reg.p.set(StatusFlags::CARRY, value & 0x80 != 0);
        self.reg.p.set_nz(result);

        self.write_operand(bus, result);
    }

    /// ROR - Rotate One Bit Right through Carry
    fn ror<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus);
        let result = (value >> 1) | ((self.reg.p.is_carry() as u8) << 7);

        self.reg.p.set(StatusFlags::CARRY, value & 0x01 != 0);
        self.reg.p.set_nz(result);

        self.write_operand(bus, result);
    }

    // ------------------------------------------------------------------
    // Loads, stores, transfers
    // ------------------------------------------------------------------

    /// LDA - Load Accumulator with Memory
    fn lda<B: Bus>(&mut self, bus: &mut B) {
        self.reg.a = self.read_operand(bus);
        self.reg.p.set_nz(self.reg.a);
    }

    /// LDX - Load Index X with Memory
    fn ldx<B: Bus>(&mut self, bus: &mut B) {
        self.reg.x = self.read_operand(bus);
        self.reg.p.set_nz(self.reg.x);
    }

    /// LDY - Load Index Y with Memory
    fn ldy<B: Bus>(&mut self, bus: &mut B) {
        self.reg.y = self.read_operand(bus);
        self.reg.p.set_nz(self.reg.y);
    }

    // Register transfers update N/Z from the copied value. TXS is the one
    // exception and leaves the flags alone.

    fn tax(&mut self) {
        self.reg.x = self.reg.a;
        self.reg.p.set_nz(self.reg.x);
    }

    fn tay(&mut self) {
        self.reg.y = self.reg.a;
        self.reg.p.set_nz(self.reg.y);
    }

    fn tsx(&mut self) {
        self.reg.x = self.reg.s;
        self.reg.p.set_nz(self.reg.x);
    }

    fn txa(&mut self) {
        self.reg.a = self.reg.x;
        self.reg.p.set_nz(self.reg.a);
    }

    fn tya(&mut self) {
        self.reg.a = self.reg.y;
        self.reg.p.set_nz(self.reg.a);
    }

    // ------------------------------------------------------------------
    // Increments and decrements
    // ------------------------------------------------------------------

    /// INC - Increment Memory by One
    fn inc<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus).wrapping_add(1);
        self.reg.p.set_nz(value);
        self.write_operand(bus, value);
    }

    /// DEC - Decrement Memory by One
    fn dec<B: Bus>(&mut self, bus: &mut B) {
        let value = self.read_operand(bus).wrapping_sub(1);
        self.reg.p.set_nz(value);
        self.write_operand(bus, value);
    }

    fn inx(&mut self) {
        self.reg.x = self.reg.x.wrapping_add(1);
        self.reg.p.set_nz(self.reg.x);
    }

    fn iny(&mut self) {
        self.reg.y = self.reg.y.wrapping_add(1);
        self.reg.p.set_nz(self.reg.y);
    }

    fn dex(&mut self) {
        self.reg.x = self.reg.x.wrapping_sub(1);
        self.reg.p.set_nz(self.reg.x);
    }

    fn dey(&mut self) {
        self.reg.y = self.reg.y.wrapping_sub(1);
        self.reg.p.set_nz(self.reg.y);
    }

    // ------------------------------------------------------------------
    // Stack operations
    // ------------------------------------------------------------------

    /// PHA - Push Accumulator on Stack
    fn pha<B: Bus>(&mut self, bus: &mut B) {
        self.push(bus, self.reg.a);
    }

    /// PHP - Push Processor Status on Stack
    ///
    /// The pushed copy has B and bit 5 set.
    fn php<B: Bus>(&mut self, bus: &mut B) {
        let pushed = self.reg.p.for_push(true);
        self.push(bus, pushed.bits());
    }

    /// PLA - Pull Accumulator from Stack
    fn pla<B: Bus>(&mut self, bus: &mut B) {
        self.reg.a = self.pull(bus);
        self.reg.p.set_nz(self.reg.a);
    }

    /// PLP - Pull Processor Status from Stack
    ///
    /// B and bit 5 in the pulled byte are ignored.
    fn plp<B: Bus>(&mut self, bus: &mut B) {
        let byte = self.pull(bus);
        self.reg.p = self.reg.p.from_pulled(byte);
    }

    // ------------------------------------------------------------------
    // Jumps, calls, returns, interrupts
    // ------------------------------------------------------------------

    /// JMP - Jump to New Location
    fn jmp(&mut self) {
        self.reg.pc = self.operand_address();
    }

    /// JSR - Jump to New Location Saving Return Address
    ///
    /// Pushes the address of the last byte of the JSR instruction; RTS
    /// adds one back.
    fn jsr<B: Bus>(&mut self, bus: &mut B) {
        let return_addr = self.reg.pc.wrapping_sub(1);
        self.push_word(bus, return_addr);
        self.reg.pc = self.operand_address();
    }

    /// RTS - Return from Subroutine
    fn rts<B: Bus>(&mut self, bus: &mut B) {
        self.reg.pc = self.pull_word(bus).wrapping_add(1);
    }

    /// RTI - Return from Interrupt
    ///
    /// Pulls P (B and bit 5 ignored) then PC, without the RTS increment.
    fn rti<B: Bus>(&mut self, bus: &mut B) {
        let byte = self.pull(bus);
        self.reg.p = self.reg.p.from_pulled(byte);
        self.reg.pc = self.pull_word(bus);
    }

    /// BRK - Force Break
    ///
    /// A software interrupt through the IRQ vector. The byte after the
    /// opcode is padding; the pushed return address skips it.
    fn brk<B: Bus>(&mut self, bus: &mut B) {
        self.interrupt(bus, super::IRQ_VECTOR, true);
    }

    // ------------------------------------------------------------------
    // Branches
    // ------------------------------------------------------------------

    /// Shared body of the eight conditional branches. A taken branch costs
    /// one extra cycle, and one more when the target lies on a different
    /// page than the instruction that follows the branch.
    fn branch<B: Bus>(&mut self, bus: &mut B, condition: bool) {
        let offset = self.read_operand(bus) as i8;
        if !condition {
            return;
        }

        let target = self.reg.pc.wrapping_add(offset as u16);
        self.branch_cycles = if (self.reg.pc & 0xFF00) != (target & 0xFF00) {
            2
        } else {
            1
        };
        self.reg.pc = target;
    }

    // ------------------------------------------------------------------
    // Operand plumbing
    // ------------------------------------------------------------------

    /// Read the current operand: the accumulator in accumulator mode, the
    /// addressed memory cell otherwise.
    pub(crate) fn read_operand<B: Bus>(&mut self, bus: &mut B) -> u8 {
        match self.operand {
            Operand::Accumulator => self.reg.a,
            Operand::Memory(addr) => bus.read(addr),
            // Implied operations never fetch an operand.
            Operand::None => 0,
        }
    }

    /// Write through the current operand, targeting A or memory.
    pub(crate) fn write_operand<B: Bus>(&mut self, bus: &mut B, value: u8) {
        match self.operand {
            Operand::Accumulator => self.reg.a = value,
            Operand::Memory(addr) => bus.write(addr, value),
            Operand::None => {}
        }
    }

    /// The resolved effective address. Only meaningful for modes that
    /// produce one; JMP and JSR are decoded exclusively with such modes.
    pub(crate) fn operand_address(&self) -> u16 {
        match self.operand {
            Operand::Memory(addr) => addr,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::FlatRam;

    /// Run a single instruction staged at $0600 with `setup` applied first.
    fn run_one(program: &[u8], setup: impl FnOnce(&mut Cpu, &mut FlatRam)) -> (Cpu, FlatRam) {
        let mut ram = FlatRam::new();
        ram.load(0x0600, program);
        ram.set_reset_vector(0x0600);

        let mut cpu = Cpu::new();
        cpu.reset(&mut ram);
        setup(&mut cpu, &mut ram);
        cpu.step(&mut ram);
        (cpu, ram)
    }

    #[test]
    fn test_bit_sets_nv_from_memory_and_z_from_mask() {
        let (cpu, _) = run_one(&[0x24, 0x20], |cpu, ram| {
            cpu.reg.a = 0x0F;
            ram.write(0x0020, 0xC0);
        });

        assert!(cpu.reg.p.is_negative());
        assert!(cpu.reg.p.is_overflow());
        assert!(cpu.reg.p.is_zero()); // 0x0F & 0xC0 == 0
        assert_eq!(cpu.reg.a, 0x0F); // A untouched
    }

    #[test]
    fn test_lsr_clears_negative_and_sets_carry_from_bit_zero() {
        let (cpu, _) = run_one(&[0x4A], |cpu, _| {
            cpu.reg.a = 0x01;
            cpu.reg.p.insert(StatusFlags::NEGATIVE);
        });

        assert_eq!(cpu.reg.a, 0x00);
        assert!(cpu.reg.p.is_carry());
        assert!(cpu.reg.p.is_zero());
        assert!(!cpu.reg.p.is_negative());
    }

    #[test]
    fn test_rol_shifts_carry_in_and_out() {
        let (cpu, _) = run_one(&[0x2A], |cpu, _| {
            cpu.reg.a = 0x80;
            cpu.reg.p.insert(StatusFlags::CARRY);
        });

        assert_eq!(cpu.reg.a, 0x01);
        assert!(cpu.reg.p.is_carry());
    }

    #[test]
    fn test_ror_memory_form() {
        let (cpu, ram) = run_one(&[0x66, 0x20], |cpu, ram| {
            ram.write(0x0020, 0x01);
            cpu.reg.p.insert(StatusFlags::CARRY);
        });

        assert_eq!(ram.peek(0x0020), 0x80);
        assert!(cpu.reg.p.is_carry());
        assert!(cpu.reg.p.is_negative());
    }

    #[test]
    fn test_cpx_uses_x_register() {
        let (cpu, _) = run_one(&[0xE0, 0x10], |cpu, _| {
            cpu.reg.x = 0x20;
        });

        assert!(cpu.reg.p.is_carry());
        assert!(!cpu.reg.p.is_zero());
        assert!(!cpu.reg.p.is_negative());
    }

    #[test]
    fn test_stx_zero_page_y_indexed() {
        let (_, ram) = run_one(&[0x96, 0x10], |cpu, _| {
            cpu.reg.x = 0x99;
            cpu.reg.y = 0x05;
        });

        assert_eq!(ram.peek(0x0015), 0x99);
    }

    #[test]
    fn test_txs_does_not_touch_flags() {
        let (cpu, _) = run_one(&[0x9A], |cpu, _| {
            cpu.reg.x = 0x00; // would set Z if TXS updated flags
        });

        assert_eq!(cpu.reg.s, 0x00);
        assert!(!cpu.reg.p.is_zero());
    }

    #[test]
    fn test_tax_updates_flags() {
        let (cpu, _) = run_one(&[0xAA], |cpu, _| {
            cpu.reg.a = 0x80;
        });

        assert_eq!(cpu.reg.x, 0x80);
        assert!(cpu.reg.p.is_negative());
    }

    #[test]
    fn test_sbc_is_adc_of_inverted_operand() {
        // 0x50 - 0x30 with carry set: 0x20, no borrow.
        let (cpu, _) = run_one(&[0xE9, 0x30], |cpu, _| {
            cpu.reg.a = 0x50;
            cpu.reg.p.insert(StatusFlags::CARRY);
        });

        assert_eq!(cpu.reg.a, 0x20);
        assert!(cpu.reg.p.is_carry());
        assert!(!cpu.reg.p.is_overflow());
    }

    #[test]
    fn test_decimal_flag_is_inert_in_adc() {
        // 0x09 + 0x01 stays binary 0x0A on the NES even with D set.
        let (cpu, _) = run_one(&[0x69, 0x01], |cpu, _| {
            cpu.reg.a = 0x09;
            cpu.reg.p.insert(StatusFlags::DECIMAL);
        });

        assert_eq!(cpu.reg.a, 0x0A);
    }
}
