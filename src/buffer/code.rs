use std::ops::{Deref, DerefMut};
use super::{Buffer};

/**
 * A growable [`Buffer`] for code under construction. Writing at the end
 * appends; writing before the end overwrites, which is how branches get
 * patched.
 */
#[derive(Debug, Default, Clone)]
pub struct CodeBuffer {
    buffer: Vec<u8>,
    pos: usize,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /** Gives up the bytes, which must not be mutated further. */
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl Deref for CodeBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &*self.buffer
    }
}

impl DerefMut for CodeBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

impl Buffer for CodeBuffer {
    fn get_pos(&self) -> usize { self.pos }

    fn set_pos(&mut self, pos: usize) {
        assert!(pos <= self.buffer.len());
        self.pos = pos;
    }

    fn write_byte(&mut self, byte: u8) {
        if self.pos == self.buffer.len() {
            self.buffer.push(byte);
        } else {
            self.buffer[self.pos] = byte;
        }
        self.pos += 1;
    }
}

//-----------------------------------------------------------------------------

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn api() {
        super::super::tests::api(CodeBuffer::new());
    }

    #[test]
    fn grows() {
        let mut buffer = CodeBuffer::new();
        assert_eq!(buffer.len(), 0);
        buffer.write(0x030201, 3);
        assert_eq!(&buffer[..], &[1, 2, 3]);
        buffer.set_pos(1);
        buffer.write_byte(0xFF);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.into_bytes(), vec![1, 0xFF, 3]);
    }
}
