//! A just-in-time compiler for Brainfuck.
//!
//! [`Jit::compile()`] checks the loop structure, emits x86_64 code for each
//! instruction in one pass, and copies the code into memory that is made
//! executable (and not writeable). [`Jit::run()`] calls it against a fresh
//! [`Tape`].

#[cfg(not(all(target_arch="x86_64", unix)))]
compile_error!("bfjit generates x86_64 System V code and needs a unix host");

pub mod program;

pub mod bracket;

pub mod error;

pub mod config;

pub mod buffer;

pub mod target;

pub mod jit;

pub use program::{Program, Instruction, Stats};
pub use bracket::{JumpTable};
pub use config::{Config, EofPolicy};
pub use error::{Error, StructuralError, MemoryError, IoError};
pub use jit::{Jit, Tape};
