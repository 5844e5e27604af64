//! Tools for generating code using the x86_64 instruction set.
//!
//! One method call on an [`Assembler`] generates one instruction. We
//! implement only the subset of x86_64 that the emitter needs, choosing
//! regular encodings over short ones.

use super::{Buffer, Patch, Label, Register, Precision, BinaryOp, Condition};
use Precision::*;
use BinaryOp::*;

//-----------------------------------------------------------------------------

/** Computes the displacement from `from` to `to`. */
pub fn disp(from: usize, to: usize) -> isize {
    if from > isize::MAX as usize || to > isize::MAX as usize {
        panic!("Displacements greater than isize::MAX are not supported");
    }
    (to as isize) - (from as isize)
}

/** Computes the i32 displacement from `from` to `to`, if possible. */
pub fn disp32(from: usize, to: usize) -> i32 {
    let disp = disp(from, to);
    if disp > i32::MAX as isize || disp < i32::MIN as isize {
        panic!("The displacement does not fit in 32 bits");
    }
    disp as i32
}

/**
 * A value which, if used as the `rel32` part of a control-flow instruction,
 * is likely to result in an immediate crash.
 */
const UNKNOWN_DISP: i32 = -0x80000000;

/** Like [`disp32()`] but returns `UNKNOWN_DISP` if `to` is `None`. */
pub fn optional_disp32(from: usize, to: Option<usize>) -> i32 {
    to.map_or(UNKNOWN_DISP, |to| disp32(from, to))
}

/**
 * An assembler, implementing a regularish subset of x86_64.
 *
 * There is a `write_x()` method for each encoding pattern `x`. A typical
 * pattern is "ROOM" meaning a REX byte, two opcode bytes, and a ModR/M byte.
 * A trailing "S" means a SIB byte follows the ModR/M byte; we use it only
 * for `[base + index]` byte operands, which is how the tape is addressed.
 *
 * Control-flow instructions take a [`Label`]. If the `Label` is not yet
 * defined, the instruction is assembled with an unknown displacement and a
 * [`Patch`] is pushed onto the `Label`. [`define()`] fills in all of them.
 *
 * [`define()`]: Assembler::define
 */
pub struct Assembler<B: Buffer> {
    /// The area we're filling with code.
    buffer: B,
}

impl<B: Buffer> Assembler<B> {
    /** Construct an Assembler that writes to `buffer` */
    pub fn new(buffer: B) -> Self {
        Assembler {buffer: buffer}
    }

    /** The code assembled so far. */
    pub fn buffer(&self) -> &B { &self.buffer }

    /** Give up the [`Buffer`]. */
    pub fn into_buffer(self) -> B { self.buffer }

    /** Get the assembly pointer. */
    pub fn get_pos(&self) -> usize {
        self.buffer.get_pos()
    }

    // Patterns and constants.

    /** Writes an 8-bit signed immediate constant. */
    pub fn write_imm8(&mut self, immediate: i8) {
        self.buffer.write(u64::from(immediate as u8), 1);
    }

    /** Writes a 32-bit signed immediate constant. */
    pub fn write_imm32(&mut self, immediate: i32) {
        self.buffer.write(u64::from(immediate as u32), 4);
    }

    /** Writes a 32-bit displacement from `self.get_pos()+4` to `target`. */
    pub fn write_rel32(&mut self, target: Option<usize>) {
        let pos = self.get_pos();
        self.write_imm32(optional_disp32(pos + 4, target));
    }

    /** Writes an instruction with pattern "OO", and no registers. */
    pub fn write_oo_0(&mut self, opcode: u64) {
        self.buffer.write(opcode, 2);
    }

    /** Writes an instruction with pattern "RO", and no registers. */
    pub fn write_ro_0(&mut self, opcode: u64) {
        self.buffer.write(opcode, 2);
    }

    /** Writes an instruction with pattern "RO", and one register. */
    pub fn write_ro_1(&mut self, mut opcode: u64, prec: Precision, rd: Register) {
        opcode |= prec.w_bit();
        opcode |= 0x0701 & rd.mask();
        self.buffer.write(opcode, 2);
    }

    /** Writes an instruction with pattern "ROM" and one register. */
    pub fn write_rom_1(&mut self, mut opcode: u64, prec: Precision, rm: Register) {
        opcode |= prec.w_bit();
        opcode |= 0x070001 & rm.mask();
        self.buffer.write(opcode, 3);
    }

    /** Writes an instruction with pattern "ROM" and two registers. */
    pub fn write_rom_2(&mut self, mut opcode: u64, prec: Precision, rm: Register, reg: Register) {
        opcode |= prec.w_bit();
        opcode |= 0x070001 & rm.mask();
        opcode |= 0x380004 & reg.mask();
        self.buffer.write(opcode, 3);
    }

    /** Writes an instruction with pattern "ROOM" and two registers. */
    pub fn write_room_2(&mut self, mut opcode: u64, prec: Precision, rm: Register, reg: Register) {
        opcode |= prec.w_bit();
        opcode |= 0x07000001 & rm.mask();
        opcode |= 0x38000004 & reg.mask();
        self.buffer.write(opcode, 4);
    }

    /**
     * Checks that `[base + index]` can be encoded with a SIB byte and no
     * displacement. `RBP` and `R13` as `base` would need a displacement,
     * and `RSP` as `index` means "no index".
     */
    fn check_indexed(base: Register, index: Register) {
        assert_ne!((base as usize) & 7, 5, "base register requires a displacement");
        assert_ne!(index, Register::RSP, "RSP cannot be an index register");
    }

    /**
     * Writes an instruction with pattern "ROMS", a `reg` register, and a
     * `[base + index]` memory operand.
     */
    pub fn write_roms_3(&mut self, mut opcode: u64, reg: Register, base: Register, index: Register) {
        Self::check_indexed(base, index);
        opcode |= 0x00380004 & reg.mask();
        opcode |= 0x07000001 & base.mask();
        opcode |= 0x38000002 & index.mask();
        self.buffer.write(opcode, 4);
    }

    /**
     * Writes an instruction with pattern "ROOMS", a `reg` register, and a
     * `[base + index]` memory operand.
     */
    pub fn write_rooms_3(&mut self, mut opcode: u64, reg: Register, base: Register, index: Register) {
        Self::check_indexed(base, index);
        opcode |= 0x0038000004 & reg.mask();
        opcode |= 0x0700000001 & base.mask();
        opcode |= 0x3800000002 & index.mask();
        self.buffer.write(opcode, 5);
    }

    /**
     * If `rm` is `RSP` or `R12`, writes the byte `0x24`, otherwise does
     * nothing.
     *
     * This is necessary after a ModR/M byte if `rm` is used as a memory
     * operand, because the bit pattern 100 in the `rm` field indicates the
     * presence of a SIB byte. `0x24` is a SIB byte with 100 in the `index`
     * field, indicating no index, and 100 in the `base` field, matching `rm`.
     */
    pub fn write_sib_fix(&mut self, rm: Register) {
        if (rm as usize) & 7 == 4 {
            self.buffer.write_byte(0x24);
        }
    }

    // Instructions.

    /** Move register to register. */
    pub fn move_(&mut self, prec: Precision, dest: Register, src: Register) {
        self.write_rom_2(0xC08B40, prec, src, dest);
    }

    /** Move memory to register. */
    pub fn load(&mut self, prec: Precision, dest: Register, src: (Register, i32)) {
        self.write_rom_2(0x808B40, prec, src.0, dest);
        self.write_sib_fix(src.0);
        self.write_imm32(src.1);
    }

    /** Move register to memory. */
    pub fn store(&mut self, prec: Precision, dest: (Register, i32), src: Register) {
        self.write_rom_2(0x808940, prec, dest.0, src);
        self.write_sib_fix(dest.0);
        self.write_imm32(dest.1);
    }

    /**
     * Move a zero-extended 32-bit constant to register.
     * If `imm` is zero, this will assemble the "zero idiom" xor instruction,
     * which corrupts the status flags.
     */
    pub fn const_(&mut self, dest: Register, imm: u32) {
        if imm == 0 {
            self.op(Xor, P32, dest, dest);
        } else {
            self.write_ro_1(0xB840, P32, dest);
            self.write_imm32(imm as i32);
        }
    }

    /** Op register to register. */
    pub fn op(&mut self, op: BinaryOp, prec: Precision, dest: Register, src: Register) {
        self.write_rom_2(op.rm_reg(), prec, dest, src);
    }

    /** Op constant to register. */
    pub fn const_op(&mut self, op: BinaryOp, prec: Precision, dest: Register, imm: i32) {
        self.write_rom_1(op.rm_imm(), prec, dest);
        self.write_imm32(imm);
    }

    /** Op 8-bit constant to the byte at `[base + index]`. */
    pub fn const_op_byte(&mut self, op: BinaryOp, dest: (Register, Register), imm: i8) {
        self.write_roms_3(op.indexed_imm8(), Register::RA, dest.0, dest.1);
        self.write_imm8(imm);
    }

    /** Load the byte at `[base + index]`, zero-extending to 32 bits. */
    pub fn load_byte(&mut self, dest: Register, src: (Register, Register)) {
        self.write_rooms_3(0x0004B60F40, dest, src.0, src.1);
    }

    /** Store the low byte of `src` at `[base + index]`. */
    pub fn store_byte(&mut self, dest: (Register, Register), src: Register) {
        self.write_roms_3(0x048840, src, dest.0, dest.1);
    }

    /** Conditional move. */
    pub fn move_if(&mut self, cc: Condition, prec: Precision, dest: Register, src: Register) {
        self.write_room_2(cc.move_if(), prec, src, dest);
    }

    /** Conditional branch. */
    pub fn jump_if(&mut self, cc: Condition, target: &mut Label) {
        let patch = Patch::new(self.get_pos());
        self.write_oo_0(cc.jump_if());
        self.write_rel32(target.target());
        if !target.is_defined() {
            target.push(patch);
        }
    }

    /** Unconditional jump to a constant. */
    pub fn const_jump(&mut self, target: &mut Label) {
        let patch = Patch::new(self.get_pos());
        self.write_ro_0(0xE940);
        self.write_rel32(target.target());
        if !target.is_defined() {
            target.push(patch);
        }
    }

    /** Unconditional call to a register. */
    pub fn call(&mut self, target: Register) {
        self.write_rom_1(0xD0FF40, P32, target);
    }

    /**
     * Change the target of the instruction at `patch` from `old_target` to
     * `new_target`.
     * - patch - the offset within the buffer of a jump instruction.
     * - new_target - an offset from the beginning of the buffer, or `None`.
     * - old_target - an offset from the beginning of the buffer, or `None`.
     */
    pub fn patch(&mut self, patch: Patch, new_target: Option<usize>, old_target: Option<usize>) {
        let pos = patch.address();
        let at = if self.buffer.read_byte(pos) == 0x0F && (self.buffer.read_byte(pos + 1) & 0xF0) == 0x80 {
            // jump_if
            pos + 2
        } else if self.buffer.read_byte(pos) == 0x40 && self.buffer.read_byte(pos + 1) == 0xE9 {
            // const_jump
            pos + 2
        } else {
            panic!("not a jump instruction");
        };
        let old_disp = self.buffer.read(at, 4) as i32;
        let old_pos = self.buffer.get_pos();
        self.buffer.set_pos(at);
        self.write_rel32(new_target);
        let at_plus_4 = self.buffer.get_pos();
        self.buffer.set_pos(old_pos);
        assert_eq!(old_disp, optional_disp32(at_plus_4, old_target));
    }

    /**
     * Define `label` to be the current assembly address, and patch all the
     * instructions that jump to it.
     */
    pub fn define(&mut self, label: &mut Label) {
        let target = self.get_pos();
        for patch in label.define(target) {
            self.patch(patch, Some(target), None);
        }
    }

    pub fn ret(&mut self) {
        self.write_ro_0(0xC340);
    }

    /** Push a register. */
    pub fn push(&mut self, rd: Register) {
        self.write_ro_1(0x5040, P64, rd);
    }

    /** Pop a register. */
    pub fn pop(&mut self, rd: Register) {
        self.write_ro_1(0x5840, P64, rd);
    }
}

//-----------------------------------------------------------------------------
