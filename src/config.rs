use super::error::{ConfigError};

/** The conventional tape length, in cells. */
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/** What an input instruction does to the current cell at end-of-stream. */
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EofPolicy {
    /** Leave the cell as it was. */
    #[default]
    Unchanged,
    /** Store 0. */
    Zero,
    /** Store 255, i.e. -1 as a byte. */
    Max,
}

impl EofPolicy {
    /**
     * The byte to store at end-of-stream, or `None` to leave the cell
     * unchanged.
     */
    pub fn byte(self) -> Option<u8> {
        match self {
            EofPolicy::Unchanged => None,
            EofPolicy::Zero => Some(0),
            EofPolicy::Max => Some(0xFF),
        }
    }
}

/** Options that affect compilation and execution. */
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /**
     * The number of cells on the tape. Pointer motion wraps modulo this.
     * The emitted code compares against it as a 32-bit immediate.
     */
    pub tape_size: usize,
    pub eof: EofPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {tape_size: DEFAULT_TAPE_SIZE, eof: EofPolicy::default()}
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tape_size == 0 || self.tape_size > i32::MAX as usize {
            return Err(ConfigError::InvalidTapeSize(self.tape_size));
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------
