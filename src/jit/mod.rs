//! Compiles a [`Program`] to native code and runs it.

use std::io::{Read, Write};

use tracing::{debug};

use super::{program, bracket, buffer, target, config, error};
use program::{Program};
use bracket::{JumpTable};
use buffer::{ExecutableRegion};
use config::{Config};
use error::{Error};

mod emitter;
pub use emitter::{emit, Emitted, TAPE, CELL, CONTEXT};

mod runtime;
pub use runtime::{Tape, Context};

/**
 * A compiled program, ready to run any number of times. Each run gets a
 * fresh [`Tape`].
 */
#[derive(Debug)]
pub struct Jit {
    config: Config,
    region: ExecutableRegion,
}

impl Jit {
    /** Parses `source` and compiles it. */
    pub fn compile(source: &[u8], config: Config) -> Result<Self, Error> {
        Self::new(&Program::parse(source), config)
    }

    /**
     * Checks the loops of `program`, emits its code, and makes the code
     * executable. Nothing is emitted if the loops are malformed.
     */
    pub fn new(program: &Program, config: Config) -> Result<Self, Error> {
        config.validate()?;
        let jumps = JumpTable::new(program)?;
        debug!(instructions = program.len(), loops = jumps.len(), "loops matched");
        let emitted = emit(program, &jumps, config.tape_size)?;
        let code = emitted.code.into_bytes();
        debug!(bytes = code.len(), "code emitted");
        let region = ExecutableRegion::new(&code)?;
        Ok(Jit {config, region})
    }

    pub fn config(&self) -> &Config { &self.config }

    /** The compiled code. */
    pub fn code(&self) -> &[u8] { self.region.code() }

    /**
     * Runs the compiled code on a fresh [`Tape`], reading `input` and writing
     * `output`. Returns the final state of the tape.
     *
     * If `output` fails, the program stops at the failing instruction.
     */
    pub fn run(&self, input: &mut dyn Read, output: &mut dyn Write) -> Result<Tape, Error> {
        let mut tape = Tape::new(self.config.tape_size);
        debug!(tape_size = tape.len(), "running");
        // SAFETY: `self.region` was emitted for `self.config.tape_size`.
        unsafe { runtime::run(&self.region, &mut tape, input, output, self.config.eof) }?;
        debug!(pointer = tape.pointer(), "finished");
        Ok(tape)
    }
}

#[cfg(test)]
mod tests;
