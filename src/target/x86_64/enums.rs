/**
 * The x86_64 general-purpose registers.
 *
 * All register names include a leading `R`, and omit a trailing `X`. This is
 * not intended to imply anything about the operand width, which is specified
 * in another way.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum Register {
    RA = 0,
    RC = 1,
    RD = 2,
    RB = 3,
    RSP = 4,
    RBP = 5,
    RSI = 6,
    RDI = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
}

use Register::*;

pub const ALL_REGISTERS: [Register; 16] = [RA, RC, RD, RB, RSP, RBP, RSI, RDI, R8, R9, R10, R11, R12, R13, R14, R15];

impl Register {
    /**
     * Returns a bit pattern which includes `self` in all useful positions:
     * the REX byte (bits 0 to 2) and the low three bits of each of the four
     * following bytes, shifted to both the `reg` and `rm` positions.
     */
    pub fn mask(self) -> u64 {
        [
            0x0000000000,
            0x0909090900, // 1
            0x1212121200, // 2
            0x1B1B1B1B00,
            0x2424242400, // 4
            0x2D2D2D2D00,
            0x3636363600,
            0x3F3F3F3F00,
            0x0000000007, // 8
            0x0909090907,
            0x1212121207,
            0x1B1B1B1B07,
            0x2424242407,
            0x2D2D2D2D07,
            0x3636363607,
            0x3F3F3F3F07,
        ][self as usize]
    }
}

//-----------------------------------------------------------------------------

/**
 * Represents the precision of an arithmetic operation.
 * With P32, the arithmetic is performed with 32-bit precision, and written
 * into the bottom 32 bits of the destination. The top 32 bits are 0.
 */
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Precision {
    P32 = 0,
    P64 = 1,
}

use Precision::*;

pub const ALL_PRECISIONS: [Precision; 2] = [P32, P64];

impl Precision {
    pub fn w_bit(self) -> u64 {
        (self as u64) << 3
    }
}

//-----------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BinaryOp {
    Add = 0,
    Or = 1,
    Adc = 2,
    Sbb = 3,
    And = 4,
    Sub = 5,
    Xor = 6,
    Cmp = 7,
}

use BinaryOp::*;

pub const ALL_BINARY_OPS: [BinaryOp; 8] = [Add, Or, Adc, Sbb, And, Sub, Xor, Cmp];

impl BinaryOp {
    pub fn rm_imm(self) -> u64 {
        0xC08140 | (self as u64) << 19
    }

    pub fn rm_reg(self) -> u64 {
        0xC00140 | (self as u64) << 11
    }

    /** Op with an 8-bit immediate on a byte addressed by base and index. */
    pub fn indexed_imm8(self) -> u64 {
        0x048040 | (self as u64) << 19
    }
}

//-----------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum Condition {
    O  = 0x0,
    NO = 0x1,
    B  = 0x2,
    AE = 0x3,
    Z  = 0x4,
    NZ = 0x5,
    BE = 0x6,
    A  = 0x7,
    S  = 0x8,
    NS = 0x9,
    P  = 0xA,
    NP = 0xB,
    L  = 0xC,
    GE = 0xD,
    LE = 0xE,
    G  = 0xF,
}

use Condition::*;

pub const ALL_CONDITIONS: [Condition; 16] = [O, NO, B, AE, Z, NZ, BE, A, S, NS, P, NP, L, GE, LE, G];

impl Condition {
    #[cfg(test)]
    pub fn invert(self) -> Self {
        ALL_CONDITIONS[(self as usize) ^ 1]
    }

    pub fn move_if(self) -> u64 {
        0xC0400F40 | ((self as u64) << 16)
    }

    pub fn jump_if(self) -> u64 {
        0x800F | ((self as u64) << 8)
    }
}
