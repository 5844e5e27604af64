//! Translates a [`Program`] into x86_64 code in one pass, backpatching the
//! forward branch of each loop when its `]` is reached.
//!
//! The compiled code is a function with the [`EntryFn`] signature. While it
//! runs, [`TAPE`] holds the address of cell 0 and [`CELL`] holds the index of
//! the current cell. Pointer motion wraps modulo the tape size.
//!
//! [`EntryFn`]: super::buffer::EntryFn

use indexmap::{IndexMap};
use tracing::{trace};

use super::{program, bracket, buffer, target, error};
use program::{Program, Instruction};
use bracket::{JumpTable};
use buffer::{CodeBuffer};
use target::{Label};
use target::x86_64::{Assembler, Register, Precision, BinaryOp, Condition, ARGUMENTS, RESULTS};
use Register::*;
use Precision::*;
use BinaryOp::*;
use Condition::*;
use error::{InternalError};
use super::runtime::{Context, NO_BYTE};

/** Holds the address of cell 0. */
pub const TAPE: Register = RB;

/** Holds the index of the current cell. */
pub const CELL: Register = R13;

/** Holds the address of the [`Context`]. */
pub const CONTEXT: Register = R14;

/** Scratch. */
pub const TEMP: Register = RA;

/** The callee-saved registers used by the compiled code. */
pub const SAVED: [Register; 3] = [TAPE, CELL, CONTEXT];

//-----------------------------------------------------------------------------

/** The result of [`emit()`]. */
#[derive(Debug)]
pub struct Emitted {
    /** The finished code. The entry point is at offset zero. */
    pub code: CodeBuffer,
    /**
     * The byte offset of the code for each instruction, followed by the
     * offset of the epilogue. The code for instruction `i` is
     * `code[offsets[i]..offsets[i+1]]`.
     */
    pub offsets: Vec<usize>,
}

/** Emits the code for `program`, whose loops are matched by `jumps`. */
pub fn emit(program: &Program, jumps: &JumpTable, tape_size: usize) -> Result<Emitted, InternalError> {
    let mut e = Emitter::new(jumps, tape_size);
    e.prologue();
    for (pos, &instruction) in program.instructions().iter().enumerate() {
        e.instruction(pos, instruction)?;
    }
    e.finish()
}

/** The state of [`emit()`]. */
struct Emitter<'a> {
    a: Assembler<CodeBuffer>,
    jumps: &'a JumpTable,
    tape_size: i32,
    /** The byte offset of each instruction emitted so far. */
    offsets: Vec<usize>,
    /** The exit branch of each open loop, keyed by the position of its `[`. */
    exits: IndexMap<usize, Label>,
    /** Jumped to when an I/O callback fails. */
    epilogue: Label,
}

impl<'a> Emitter<'a> {
    fn new(jumps: &'a JumpTable, tape_size: usize) -> Self {
        debug_assert!(tape_size > 0 && tape_size <= i32::MAX as usize);
        Emitter {
            a: Assembler::new(CodeBuffer::new()),
            jumps,
            tape_size: tape_size as i32,
            offsets: Vec::new(),
            exits: IndexMap::new(),
            epilogue: Label::new(),
        }
    }

    fn prologue(&mut self) {
        if SAVED.len() & 1 != 1 {
            // Adjust alignment of RSP to be 16-byte aligned.
            self.a.push(SAVED[0]);
        }
        for &r in &SAVED {
            self.a.push(r);
        }
        self.a.move_(P64, TAPE, ARGUMENTS[0]);
        self.a.move_(P64, CONTEXT, ARGUMENTS[1]);
        self.a.const_(CELL, 0);
    }

    fn epilogue(&mut self) {
        self.a.define(&mut self.epilogue);
        self.a.store(P64, (CONTEXT, Context::pointer_offset()), CELL);
        for &r in SAVED.iter().rev() {
            self.a.pop(r);
        }
        if SAVED.len() & 1 != 1 {
            self.a.pop(SAVED[0]);
        }
        self.a.ret();
    }

    /** Calls the callback at `offset` in the [`Context`]. */
    fn call_context(&mut self, offset: i32) {
        self.a.move_(P64, ARGUMENTS[0], CONTEXT);
        self.a.load(P64, TEMP, (CONTEXT, offset));
        self.a.call(TEMP);
    }

    fn instruction(&mut self, pos: usize, instruction: Instruction) -> Result<(), InternalError> {
        let here = self.a.get_pos();
        trace!(pos, offset = here, %instruction, "emit");
        self.offsets.push(here);
        match instruction {
            Instruction::Right => {
                // `const_()` corrupts the flags, so it goes first.
                self.a.const_(TEMP, 0);
                self.a.const_op(Add, P32, CELL, 1);
                self.a.const_op(Cmp, P32, CELL, self.tape_size);
                self.a.move_if(Z, P32, CELL, TEMP);
            },
            Instruction::Left => {
                self.a.const_(TEMP, (self.tape_size - 1) as u32);
                self.a.const_op(Sub, P32, CELL, 1);
                self.a.move_if(B, P32, CELL, TEMP);
            },
            Instruction::Increment => {
                self.a.const_op_byte(Add, (TAPE, CELL), 1);
            },
            Instruction::Decrement => {
                self.a.const_op_byte(Sub, (TAPE, CELL), 1);
            },
            Instruction::Output => {
                self.a.load_byte(ARGUMENTS[1], (TAPE, CELL));
                self.call_context(Context::write_offset());
                self.a.const_op(Cmp, P32, RESULTS[0], 0);
                self.a.jump_if(NZ, &mut self.epilogue);
            },
            Instruction::Input => {
                self.call_context(Context::read_offset());
                let mut unchanged = Label::new();
                self.a.const_op(Cmp, P32, RESULTS[0], NO_BYTE as i32);
                self.a.jump_if(Z, &mut unchanged);
                self.a.jump_if(A, &mut self.epilogue);
                self.a.store_byte((TAPE, CELL), RESULTS[0]);
                self.a.define(&mut unchanged);
            },
            Instruction::LoopBegin => {
                let mut exit = Label::new();
                self.a.const_op_byte(Cmp, (TAPE, CELL), 0);
                self.a.jump_if(Z, &mut exit);
                self.exits.insert(pos, exit);
            },
            Instruction::LoopEnd => {
                let begin = self.jumps.begin_of(pos)
                    .filter(|&begin| begin < pos)
                    .ok_or(InternalError::UnmatchedLoopEnd(pos))?;
                let mut exit = self.exits.swap_remove(&begin)
                    .ok_or(InternalError::UnmatchedLoopEnd(pos))?;
                let mut test = Label::at(self.offsets[begin]);
                self.a.const_jump(&mut test);
                self.a.define(&mut exit);
            },
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Emitted, InternalError> {
        self.offsets.push(self.a.get_pos());
        self.epilogue();
        if let Some(&begin) = self.exits.keys().next() {
            return Err(InternalError::UnresolvedPatch(begin));
        }
        Ok(Emitted {code: self.a.into_buffer(), offsets: self.offsets})
    }
}

//-----------------------------------------------------------------------------
