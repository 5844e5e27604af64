use memmap::{Mmap, MmapMut};
use tracing::{trace};

use super::super::error::{MemoryError};

/** The signature of compiled code: `(tape, context)`, no result. */
pub type EntryFn = unsafe extern "sysv64" fn(*mut u8, *mut ());

/** Returns the size of a memory page. */
pub fn page_size() -> usize {
    // SAFETY: `sysconf` has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 { size as usize } else { 0x1000 }
}

/**
 * A page-aligned block of memory holding finished code. It is filled while
 * writeable, then made executable and read-only, once. It is never writeable
 * and executable at the same time.
 *
 * This is the only place where code bytes become something callable.
 */
pub struct ExecutableRegion {
    memory: Mmap,
    /** The number of bytes of code, excluding padding. */
    code_len: usize,
}

impl ExecutableRegion {
    /**
     * Copies `code` into fresh pages and makes them executable. On error,
     * any memory allocated so far is released.
     */
    pub fn new(code: &[u8]) -> Result<Self, MemoryError> {
        let page = page_size();
        let size = std::cmp::max(code.len(), 1).div_ceil(page) * page;
        let mut memory = MmapMut::map_anon(size)
            .map_err(|source| MemoryError::AllocationFailed {size, source})?;
        trace!(size, code_len = code.len(), "allocated code region");
        memory[..code.len()].copy_from_slice(code);
        // Dropping `memory` on failure unmaps it.
        let memory = memory.make_exec().map_err(MemoryError::ProtectionChangeFailed)?;
        trace!(size, "code region is now executable");
        Ok(ExecutableRegion {memory, code_len: code.len()})
    }

    /** The size of the region in bytes, a whole number of pages. */
    pub fn len(&self) -> usize { self.memory.len() }

    pub fn is_empty(&self) -> bool { self.code_len == 0 }

    /** The code, excluding padding. */
    pub fn code(&self) -> &[u8] { &self.memory[..self.code_len] }

    /**
     * Calls the code at offset zero as an [`EntryFn`].
     *
     * # Safety
     *
     * The code must be valid native code with the signature of [`EntryFn`],
     * and must only access memory that `tape` and `context` make valid.
     */
    pub unsafe fn invoke(&self, tape: *mut u8, context: *mut ()) {
        let entry: EntryFn = std::mem::transmute(self.memory.as_ptr());
        entry(tape, context)
    }
}

impl std::fmt::Debug for ExecutableRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutableRegion")
            .field("address", &format!("{:p}", self.memory.as_ptr()))
            .field("len", &self.len())
            .field("code_len", &self.code_len)
            .finish()
    }
}

//-----------------------------------------------------------------------------
