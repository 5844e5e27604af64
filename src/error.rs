use thiserror::{Error};

/**
 * A malformed loop structure. The position is the byte offset of the
 * offending bracket in the source text.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("unmatched ']' at byte {0}")]
    UnbalancedLoopEnd(usize),
    #[error("unterminated '[' at byte {0}")]
    UnterminatedLoopBegin(usize),
}

/** Failure to set up the executable memory. */
#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("could not allocate {size} bytes of code memory: {source}")]
    AllocationFailed { size: usize, source: std::io::Error },
    #[error("could not make code memory executable: {0}")]
    ProtectionChangeFailed(std::io::Error),
}

/** Failure of the program's standard streams while it runs. */
#[derive(Debug, Error)]
pub enum IoError {
    #[error("write to output failed: {0}")]
    WriteFailed(std::io::Error),
    #[error("read from input failed: {0}")]
    ReadFailed(std::io::Error),
    #[error("flush of output failed: {0}")]
    FlushFailed(std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tape size must be between 1 and {max} cells, not {0}", max = i32::MAX)]
    InvalidTapeSize(usize),
}

/** Broken emitter invariants. Unreachable for a validated program. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("loop end at instruction {0} has no emitted loop begin")]
    UnmatchedLoopEnd(usize),
    #[error("loop branch at instruction {0} was never resolved")]
    UnresolvedPatch(usize),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

pub type Result<T> = std::result::Result<T, Error>;

//-----------------------------------------------------------------------------
