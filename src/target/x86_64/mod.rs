use super::{buffer, Patch, Label};
use buffer::{Buffer};

mod enums;
pub use enums::{Register, ALL_REGISTERS, Precision, ALL_PRECISIONS, BinaryOp, ALL_BINARY_OPS, Condition, ALL_CONDITIONS};
use Register::*;

mod assembler;
pub use assembler::{Assembler};

/**
 * In the System V amd64 calling convention, these registers must be preserved
 * by subroutines, as must `RSP`.
 */
pub const CALLEE_SAVES: [Register; 6] = [RB, RBP, R12, R13, R14, R15];

/**
 * In the System V amd64 calling convention, these registers hold the integer-
 * or pointer-type function arguments.
 */
pub const ARGUMENTS: [Register; 6] = [RDI, RSI, RD, RC, R8, R9];

/**
 * In the System V amd64 calling convention, these registers hold the integer-
 * or pointer-type function results.
 */
pub const RESULTS: [Register; 2] = [RA, RD];

#[cfg(test)]
pub use assembler::tests::{disassemble};
