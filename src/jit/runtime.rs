//! The state the compiled code runs against: the [`Tape`], and a
//! [`Context`] holding the I/O callbacks it calls.

use std::io::{self, Read, Write};

use memoffset::{offset_of};

use super::{buffer, config, error};
use buffer::{ExecutableRegion};
use config::{EofPolicy};
use error::{IoError};

/** A fixed-length, zero-initialized array of cells, and a data pointer. */
#[derive(Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Box<[u8]>,
    pointer: usize,
}

impl Tape {
    pub fn new(size: usize) -> Self {
        Tape {cells: vec![0; size].into_boxed_slice(), pointer: 0}
    }

    pub fn cells(&self) -> &[u8] { &self.cells }

    /** The index of the current cell. */
    pub fn pointer(&self) -> usize { self.pointer }

    /** The value of the current cell. */
    pub fn current(&self) -> u8 { self.cells[self.pointer] }

    pub fn len(&self) -> usize { self.cells.len() }

    pub fn is_empty(&self) -> bool { self.cells.is_empty() }
}

impl std::fmt::Debug for Tape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Long runs of zeros are not interesting.
        let used = self.cells.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1);
        f.debug_struct("Tape")
            .field("len", &self.cells.len())
            .field("pointer", &self.pointer)
            .field("cells", &&self.cells[..used])
            .finish()
    }
}

//-----------------------------------------------------------------------------

/** Returned by a [`ReadFn`] to leave the current cell unchanged. */
pub const NO_BYTE: u32 = 0x100;

/** Returned by an I/O callback to abandon the run. */
pub const FAILED: u32 = 0x101;

/** Reads a byte. Returns the byte, [`NO_BYTE`], or [`FAILED`]. */
pub type ReadFn = for<'a> extern "sysv64" fn(*mut Context<'a>) -> u32;

/** Writes the low byte of its argument. Returns 0 or [`FAILED`]. */
pub type WriteFn = for<'a> extern "sysv64" fn(*mut Context<'a>, u32) -> u32;

/**
 * The second argument of the compiled code. The code finds the callbacks
 * at fixed offsets, and stores the final data pointer in `pointer`. The
 * other fields are private to the callbacks.
 */
#[repr(C)]
pub struct Context<'a> {
    read: ReadFn,
    write: WriteFn,
    pointer: u64,
    input: &'a mut dyn Read,
    output: &'a mut dyn Write,
    eof: EofPolicy,
    /** The first I/O error, which ended the run. */
    error: Option<IoError>,
}

type StaticContext = Context<'static>;

impl<'a> Context<'a> {
    pub fn new(input: &'a mut dyn Read, output: &'a mut dyn Write, eof: EofPolicy) -> Self {
        Context {
            read: read_callback,
            write: write_callback,
            pointer: 0,
            input,
            output,
            eof,
            error: None,
        }
    }

    /** The offset of the [`ReadFn`]. */
    pub fn read_offset() -> i32 { offset_of!(StaticContext, read) as i32 }

    /** The offset of the [`WriteFn`]. */
    pub fn write_offset() -> i32 { offset_of!(StaticContext, write) as i32 }

    /** The offset of the data pointer, as a `u64`. */
    pub fn pointer_offset() -> i32 { offset_of!(StaticContext, pointer) as i32 }

    fn read_byte(&mut self) -> u32 {
        let mut byte = [0u8];
        loop {
            return match self.input.read(&mut byte) {
                Ok(0) => self.eof.byte().map_or(NO_BYTE, u32::from),
                Ok(_) => u32::from(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.error = Some(IoError::ReadFailed(e));
                    FAILED
                },
            };
        }
    }

    /** Writes and flushes `byte`, so that output appears as it happens. */
    fn write_byte(&mut self, byte: u8) -> u32 {
        let result = self.output.write_all(&[byte]).map_err(IoError::WriteFailed)
            .and_then(|()| self.output.flush().map_err(IoError::FlushFailed));
        match result {
            Ok(()) => 0,
            Err(e) => {
                self.error = Some(e);
                FAILED
            },
        }
    }

    /** Reports the error that ended the run, if any, then flushes. */
    fn finish(self) -> Result<(), IoError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.output.flush().map_err(IoError::FlushFailed)
    }
}

extern "sysv64" fn read_callback(context: *mut Context<'_>) -> u32 {
    // SAFETY: The compiled code passes back the pointer `run()` gave it.
    let context = unsafe { &mut *context };
    context.read_byte()
}

extern "sysv64" fn write_callback(context: *mut Context<'_>, byte: u32) -> u32 {
    // SAFETY: The compiled code passes back the pointer `run()` gave it.
    let context = unsafe { &mut *context };
    context.write_byte(byte as u8)
}

//-----------------------------------------------------------------------------

/**
 * Calls the code in `region` against `tape`, reading `input` and writing
 * `output`, then records the final data pointer in `tape`.
 *
 * # Safety
 *
 * `region` must hold code produced by the emitter for a tape of exactly
 * `tape.len()` cells, and `tape.pointer()` must be zero.
 */
pub unsafe fn run(
    region: &ExecutableRegion,
    tape: &mut Tape,
    input: &mut dyn Read,
    output: &mut dyn Write,
    eof: EofPolicy,
) -> Result<(), IoError> {
    let mut context = Context::new(input, output, eof);
    region.invoke(tape.cells.as_mut_ptr(), &mut context as *mut Context as *mut ());
    tape.pointer = context.pointer as usize;
    context.finish()
}

//-----------------------------------------------------------------------------
