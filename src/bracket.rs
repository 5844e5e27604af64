//! Loop validation. Runs to completion before any code is emitted.

use indexmap::{IndexMap};

use super::program::{Program, Instruction};
use super::error::{StructuralError};

/**
 * The matching between loop brackets, keyed by position in the [`Program`].
 * Every `[` has exactly one `]` and vice versa.
 */
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JumpTable {
    /** Maps each `[` to its `]`, in order of the `]`s. */
    forward: IndexMap<usize, usize>,
    /** Maps each `]` to its `[`, in source order. */
    backward: IndexMap<usize, usize>,
}

impl JumpTable {
    /**
     * Scans `program` once, pairing brackets using a stack of unmatched
     * `[`s.
     */
    pub fn new(program: &Program) -> Result<Self, StructuralError> {
        let mut table = JumpTable::default();
        let mut open: Vec<usize> = Vec::new();
        for (pos, &instruction) in program.instructions().iter().enumerate() {
            match instruction {
                Instruction::LoopBegin => {
                    open.push(pos);
                },
                Instruction::LoopEnd => {
                    let begin = open.pop().ok_or_else(
                        || StructuralError::UnbalancedLoopEnd(program.source_position(pos))
                    )?;
                    table.forward.insert(begin, pos);
                    table.backward.insert(pos, begin);
                },
                _ => {},
            }
        }
        if let Some(&begin) = open.last() {
            return Err(StructuralError::UnterminatedLoopBegin(program.source_position(begin)));
        }
        Ok(table)
    }

    /** The position of the `]` matching the `[` at `begin`. */
    pub fn end_of(&self, begin: usize) -> Option<usize> {
        self.forward.get(&begin).copied()
    }

    /** The position of the `[` matching the `]` at `end`. */
    pub fn begin_of(&self, end: usize) -> Option<usize> {
        self.backward.get(&end).copied()
    }

    /** The number of matched pairs. */
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.forward.len(), self.backward.len());
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /** Iterates over (`[`, `]`) pairs, innermost-first. */
    pub fn pairs(&self) -> impl Iterator<Item=(usize, usize)> + '_ {
        self.forward.iter().map(|(&begin, &end)| (begin, end))
    }
}

//-----------------------------------------------------------------------------
