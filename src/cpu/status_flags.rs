use bitflags::bitflags;

bitflags! {
    /// # CPU Status Register (P) Flags
    ///
    /// The status register contains 7 flags that indicate the current state
    /// of the CPU. The 5th bit is unused but always set to 1 when pushed to
    /// the stack.
    ///
    /// | Bit | Mask | Name       | Description                                      |
    /// |-----|------|------------|--------------------------------------------------|
    /// | 7   | 0x80 | NEGATIVE   | Set when the result is negative                  |
    /// | 6   | 0x40 | OVERFLOW   | Set when a signed overflow occurs                |
    /// | 5   | 0x20 | UNUSED     | Always set to 1 when pushed to stack             |
    /// | 4   | 0x10 | BREAK      | Set on the pushed copy by BRK and PHP            |
    /// | 3   | 0x08 | DECIMAL    | Decimal mode flag (inert on the NES)             |
    /// | 2   | 0x04 | INTERRUPT_DISABLE | When set, disables maskable interrupts    |
    /// | 1   | 0x02 | ZERO       | Set when the result is zero                      |
    /// | 0   | 0x01 | CARRY      | Set when an operation results in a carry/borrow  |
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct StatusFlags: u8 {
        /// Carry Flag
        const CARRY = 0b0000_0001;
        /// Zero Flag
        const ZERO = 0b0000_0010;
        /// Interrupt Disable
        const INTERRUPT_DISABLE = 0b0000_0100;
        /// Decimal Mode (inert on the NES)
        const DECIMAL = 0b0000_1000;
        /// Break Command
        const BREAK = 0b0001_0000;
        /// Unused (always 1 when pushed to stack)
        const UNUSED = 0b0010_0000;
        /// Overflow Flag
        const OVERFLOW = 0b0100_0000;
        /// Negative Flag
        const NEGATIVE = 0b1000_0000;
    }
}

impl StatusFlags {
    pub fn is_carry(&self) -> bool {
        self.contains(StatusFlags::CARRY)
    }

    pub fn is_zero(&self) -> bool {
        self.contains(StatusFlags::ZERO)
    }

    pub fn is_interrupt(&self) -> bool {
        self.contains(StatusFlags::INTERRUPT_DISABLE)
    }

    pub fn is_decimal(&self) -> bool {
        self.contains(StatusFlags::DECIMAL)
    }

    pub fn is_break(&self) -> bool {
        self.contains(StatusFlags::BREAK)
    }

    pub fn is_overflow(&self) -> bool {
        self.contains(StatusFlags::OVERFLOW)
    }

    pub fn is_negative(&self) -> bool {
        self.contains(StatusFlags::NEGATIVE)
    }

    /// N is bit 7 of the low byte of `value`.
    ///
    /// The setters on this type take wider-than-8-bit values so ALU code can
    /// feed raw 9-bit sums and shifts straight in.
    pub fn set_negative_from(&mut self, value: u16) {
        self.set(StatusFlags::NEGATIVE, value as u8 & 0x80 != 0);
    }

    /// Z is set when the low byte of `value` is zero.
    pub fn set_zero_from(&mut self, value: u16) {
        self.set(StatusFlags::ZERO, value as u8 == 0);
    }

    /// C is bit 8 of `value`.
    ///
    /// This covers additive and left-shift paths. Right shifts derive their
    /// carry from bit 0 of the pre-shift value and must set C explicitly.
    pub fn set_carry_from(&mut self, value: u16) {
        self.set(StatusFlags::CARRY, value > 0xFF);
    }

    /// N and Z from an 8-bit result, the common pair for loads, transfers
    /// and logic operations.
    pub fn set_nz(&mut self, value: u8) {
        self.set_negative_from(value as u16);
        self.set_zero_from(value as u16);
    }

    /// The byte that goes on the stack: bit 5 always reads 1, and B is set
    /// only when the push comes from software (BRK or PHP), not from a
    /// hardware interrupt.
    pub fn for_push(&self, software: bool) -> StatusFlags {
        let mut pushed = *self | StatusFlags::UNUSED;
        pushed.set(StatusFlags::BREAK, software || self.is_break());
        pushed
    }

    /// Restore P from a byte pulled off the stack. B keeps its current
    /// in-register value and bit 5 is forced to 1, per hardware.
    pub fn from_pulled(&self, byte: u8) -> StatusFlags {
        let pulled = StatusFlags::from_bits_truncate(byte);
        let kept = *self & StatusFlags::BREAK;
        (pulled - StatusFlags::BREAK - StatusFlags::UNUSED) | kept | StatusFlags::UNUSED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_setters() {
        let mut p = StatusFlags::empty();

        p.set_carry_from(0x100);
        assert!(p.is_carry());
        p.set_carry_from(0xFF);
        assert!(!p.is_carry());

        p.set_zero_from(0x100); // low byte zero
        assert!(p.is_zero());
        p.set_zero_from(0x101);
        assert!(!p.is_zero());

        p.set_negative_from(0x80);
        assert!(p.is_negative());
        p.set_negative_from(0x7F);
        assert!(!p.is_negative());
    }

    #[test]
    fn test_push_sets_unused_and_break() {
        let p = StatusFlags::CARRY;

        let hardware = p.for_push(false);
        assert!(hardware.contains(StatusFlags::UNUSED));
        assert!(!hardware.contains(StatusFlags::BREAK));
        assert_eq!(hardware.bits(), 0x21);

        let software = p.for_push(true);
        assert!(software.contains(StatusFlags::BREAK));
        assert_eq!(software.bits(), 0x31);
    }

    #[test]
    fn test_pull_ignores_break_and_unused() {
        let p = StatusFlags::UNUSED;

        // Pulled byte claims B set; the in-register B (clear) wins.
        let restored = p.from_pulled(0xFF);
        assert!(!restored.is_break());
        assert!(restored.contains(StatusFlags::UNUSED));
        assert!(restored.is_carry());
        assert!(restored.is_negative());

        // Pulled byte claims bit 5 clear; it is forced back to 1.
        let restored = p.from_pulled(0x00);
        assert!(restored.contains(StatusFlags::UNUSED));
    }
}
