//! The source language: eight single-character instructions, everything else
//! is commentary.

use std::fmt;

/** The eight instruction forms. */
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    /** `>` */
    Right,
    /** `<` */
    Left,
    /** `+` */
    Increment,
    /** `-` */
    Decrement,
    /** `.` */
    Output,
    /** `,` */
    Input,
    /** `[` */
    LoopBegin,
    /** `]` */
    LoopEnd,
}

use Instruction::*;

pub const ALL_INSTRUCTIONS: [Instruction; 8] =
    [Right, Left, Increment, Decrement, Output, Input, LoopBegin, LoopEnd];

impl Instruction {
    /** Returns the `Instruction` spelt `byte`, or `None` for commentary. */
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'>' => Right,
            b'<' => Left,
            b'+' => Increment,
            b'-' => Decrement,
            b'.' => Output,
            b',' => Input,
            b'[' => LoopBegin,
            b']' => LoopEnd,
            _ => return None,
        })
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Right => b'>',
            Left => b'<',
            Increment => b'+',
            Decrement => b'-',
            Output => b'.',
            Input => b',',
            LoopBegin => b'[',
            LoopEnd => b']',
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_byte() as char)
    }
}

//-----------------------------------------------------------------------------

/**
 * A parsed program. Instructions are indexed by their position in the
 * filtered instruction sequence; [`Program::source_position()`] maps each
 * back to a byte offset in the original source text.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    /** Indexed like `instructions`. */
    offsets: Vec<usize>,
}

impl Program {
    /** Filters `source` down to its instructions. Never fails. */
    pub fn parse(source: &[u8]) -> Self {
        let mut program = Program::default();
        for (offset, &byte) in source.iter().enumerate() {
            if let Some(instruction) = Instruction::from_byte(byte) {
                program.instructions.push(instruction);
                program.offsets.push(offset);
            }
        }
        program
    }

    pub fn instructions(&self) -> &[Instruction] { &self.instructions }

    pub fn len(&self) -> usize { self.instructions.len() }

    pub fn is_empty(&self) -> bool { self.instructions.is_empty() }

    /** The byte offset in the source text of the instruction at `pos`. */
    pub fn source_position(&self, pos: usize) -> usize { self.offsets[pos] }

    /** Counts the instructions of each form. */
    pub fn stats(&self) -> Stats {
        let mut stats = Stats::default();
        for &instruction in &self.instructions {
            match instruction {
                Right => stats.right += 1,
                Left => stats.left += 1,
                Increment => stats.increment += 1,
                Decrement => stats.decrement += 1,
                Output => stats.output += 1,
                Input => stats.input += 1,
                LoopBegin => stats.loops += 1,
                LoopEnd => {},
            }
        }
        stats
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            write!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------

/** Instruction counts for a [`Program`]. */
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Stats {
    pub right: usize,
    pub left: usize,
    pub increment: usize,
    pub decrement: usize,
    pub output: usize,
    pub input: usize,
    /** The number of `[` instructions, whether or not they are matched. */
    pub loops: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "> {}, < {}, + {}, - {}, . {}, , {}, loops {}",
            self.right, self.left, self.increment, self.decrement,
            self.output, self.input, self.loops,
        )
    }
}

//-----------------------------------------------------------------------------

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn commentary() {
        let program = Program::parse(b"a+b[c-]d\n.e");
        assert_eq!(program.instructions(), &[Increment, LoopBegin, Decrement, LoopEnd, Output]);
        assert_eq!(program.source_position(0), 1);
        assert_eq!(program.source_position(3), 6);
        assert_eq!(program.source_position(4), 9);
        assert_eq!(program.to_string(), "+[-].");
    }

    #[test]
    fn spelling() {
        for &i in &ALL_INSTRUCTIONS {
            assert_eq!(Instruction::from_byte(i.to_byte()), Some(i));
        }
        assert_eq!(Instruction::from_byte(b'x'), None);
    }

    #[test]
    fn empty() {
        let program = Program::parse(b"no instructions here");
        assert!(program.is_empty());
        assert_eq!(program.stats(), Stats::default());
    }

    #[test]
    fn stats() {
        let stats = Program::parse(b">>+[<-[.,]]").stats();
        assert_eq!(stats, Stats {
            right: 2, left: 1, increment: 1, decrement: 1,
            output: 1, input: 1, loops: 2,
        });
    }
}
