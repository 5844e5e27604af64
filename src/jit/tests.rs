use std::io::{self, Cursor, Read, Write};

use rand::{Rng, SeedableRng};
use rand_pcg::{Pcg64};

use super::*;
use super::super::config::{EofPolicy};
use super::super::error::{StructuralError, IoError, ConfigError};

const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

/** Compiles and runs `source` with `config`, returning the output and tape. */
fn run_with(source: &str, input: &[u8], config: Config) -> (Vec<u8>, Tape) {
    let jit = Jit::compile(source.as_bytes(), config).expect("Compile failed");
    let mut input = Cursor::new(input.to_vec());
    let mut output = Vec::new();
    let tape = jit.run(&mut input, &mut output).expect("Run failed");
    (output, tape)
}

fn run(source: &str, input: &[u8]) -> (Vec<u8>, Tape) {
    run_with(source, input, Config::default())
}

fn small(tape_size: usize) -> Config {
    Config {tape_size, ..Config::default()}
}

#[test]
fn hello_world() {
    let (output, _) = run(HELLO_WORLD, b"");
    assert_eq!(output, b"Hello World!\n");
}

#[test]
fn run_twice() {
    let jit = Jit::compile(HELLO_WORLD.as_bytes(), Config::default()).unwrap();
    for _ in 0..2 {
        let mut output = Vec::new();
        jit.run(&mut io::empty(), &mut output).unwrap();
        assert_eq!(output, b"Hello World!\n");
    }
}

#[test]
fn empty() {
    let (output, tape) = run("", b"");
    assert!(output.is_empty());
    assert_eq!(tape.pointer(), 0);
    assert_eq!(tape.len(), 30_000);
    assert!(tape.cells().iter().all(|&c| c == 0));
    let (output, _) = run("This text has no instructions", b"");
    assert!(output.is_empty());
}

#[test]
fn increment_wraps() {
    let (_, tape) = run(&"+".repeat(256), b"");
    assert_eq!(tape.current(), 0);
    let (_, tape) = run(&"+".repeat(256 + 7), b"");
    assert_eq!(tape.current(), 7);
    let (_, tape) = run("-", b"");
    assert_eq!(tape.current(), 255);
    let (_, tape) = run(&format!("{}{}", "-".repeat(3), "+".repeat(256)), b"");
    assert_eq!(tape.current(), 253);
}

#[test]
fn clear_loop() {
    for v in [0, 1, 2, 17, 128, 255] {
        // Each iteration outputs the decremented value.
        let (output, tape) = run(&format!("{}[-.]", "+".repeat(v)), b"");
        assert_eq!(output.len(), v);
        let expected: Vec<u8> = (0..v as u8).rev().collect();
        assert_eq!(output, expected);
        assert_eq!(tape.current(), 0);
    }
}

#[test]
fn right_then_left() {
    let (_, before) = run("+++>++>+", b"");
    let (_, after) = run("+++>++>+><", b"");
    assert_eq!(before, after);
    assert_eq!(after.pointer(), 2);
    // At the boundaries.
    let (_, tape) = run_with("+<>", b"", small(8));
    assert_eq!(tape.pointer(), 0);
    assert_eq!(tape.cells(), &[1, 0, 0, 0, 0, 0, 0, 0]);
    let (_, tape) = run_with("<<+><", b"", small(8));
    assert_eq!(tape.pointer(), 6);
    assert_eq!(tape.cells(), &[0, 0, 0, 0, 0, 0, 1, 0]);
}

#[test]
fn pointer_wraps() {
    let (_, tape) = run_with(">>>>", b"", small(4));
    assert_eq!(tape.pointer(), 0);
    let (_, tape) = run_with("<+", b"", small(4));
    assert_eq!(tape.pointer(), 3);
    assert_eq!(tape.cells(), &[0, 0, 0, 1]);
    let (_, tape) = run_with("<<<<<+", b"", small(4));
    assert_eq!(tape.pointer(), 3);
    let (_, tape) = run_with(">+>+>+", b"", small(1));
    assert_eq!(tape.pointer(), 0);
    assert_eq!(tape.cells(), &[3]);
    let (_, tape) = run_with("<<-", b"", small(1));
    assert_eq!(tape.cells(), &[255]);
    let (_, tape) = run(&"<".repeat(30_000), b"");
    assert_eq!(tape.pointer(), 0);
}

#[test]
fn multiply() {
    let (output, tape) = run("++++++[>++++++++<-]>.", b"");
    assert_eq!(output, b"0");
    assert_eq!(tape.cells()[..2], [0, 48]);
}

#[test]
fn nested_skipped() {
    let source = format!("{}+{}", "[".repeat(1000), "]".repeat(1000));
    let (_, tape) = run(&source, b"");
    assert_eq!(tape.current(), 0);
}

#[test]
fn input() {
    let (_, tape) = run(",>,>,", b"AB");
    assert_eq!(tape.cells()[..3], [b'A', b'B', 0]);
    let (output, _) = run(",+.", b"a");
    assert_eq!(output, b"b");
}

#[test]
fn eof() {
    let (_, tape) = run("+++,", b"");
    assert_eq!(tape.current(), 3);
    let (_, tape) = run_with("+++,", b"", Config {eof: EofPolicy::Zero, ..Config::default()});
    assert_eq!(tape.current(), 0);
    let (_, tape) = run_with("+++,", b"", Config {eof: EofPolicy::Max, ..Config::default()});
    assert_eq!(tape.current(), 255);
}

#[test]
fn echo() {
    let config = Config {eof: EofPolicy::Zero, ..Config::default()};
    let (output, _) = run_with(",[.,]", b"hello, world", config);
    assert_eq!(output, b"hello, world");
}

/** A writer that fails and counts its attempts. */
struct Failing {
    attempts: usize,
}

impl Write for Failing {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        self.attempts += 1;
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

#[test]
fn write_failed() {
    let jit = Jit::compile(b"+.+.+.", Config::default()).unwrap();
    let mut output = Failing {attempts: 0};
    let result = jit.run(&mut io::empty(), &mut output);
    assert!(matches!(result, Err(Error::Io(IoError::WriteFailed(_)))));
    // The program stopped at the first `.`.
    assert_eq!(output.attempts, 1);
}

/** A reader that always fails. */
struct Unreadable;

impl Read for Unreadable {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "unreadable"))
    }
}

#[test]
fn read_failed() {
    let jit = Jit::compile(b",.", Config::default()).unwrap();
    let mut output = Vec::new();
    let result = jit.run(&mut Unreadable, &mut output);
    assert!(matches!(result, Err(Error::Io(IoError::ReadFailed(_)))));
    assert!(output.is_empty());
}

#[test]
fn structural_errors() {
    let result = Jit::compile(b"+]", Config::default());
    assert!(matches!(result, Err(Error::Structural(StructuralError::UnbalancedLoopEnd(1)))));
    let result = Jit::compile(b"[[]", Config::default());
    assert!(matches!(result, Err(Error::Structural(StructuralError::UnterminatedLoopBegin(0)))));
}

#[test]
fn invalid_config() {
    let result = Jit::compile(b"+", small(0));
    assert!(matches!(result, Err(Error::Config(ConfigError::InvalidTapeSize(0)))));
}

#[test]
fn code() {
    let jit = Jit::compile(b"+", Config::default()).unwrap();
    // Prologue, one instruction, epilogue.
    assert_eq!(jit.code().len(), 15 + 5 + 15);
    assert_eq!(&jit.code()[15..20], &[0x42, 0x80, 0x04, 0x2B, 0x01]);
}

//-----------------------------------------------------------------------------

/** A slow but obviously correct reference, for comparison. */
fn interpret(program: &Program, tape_size: usize) -> (Vec<u8>, Vec<u8>, usize) {
    let jumps = JumpTable::new(program).unwrap();
    let instructions = program.instructions();
    let mut cells = vec![0u8; tape_size];
    let mut pointer = 0;
    let mut output = Vec::new();
    let mut pc = 0;
    while pc < instructions.len() {
        use program::Instruction::*;
        match instructions[pc] {
            Right => { pointer = (pointer + 1) % tape_size; },
            Left => { pointer = (pointer + tape_size - 1) % tape_size; },
            Increment => { cells[pointer] = cells[pointer].wrapping_add(1); },
            Decrement => { cells[pointer] = cells[pointer].wrapping_sub(1); },
            Output => { output.push(cells[pointer]); },
            Input => {},
            LoopBegin => if cells[pointer] == 0 { pc = jumps.end_of(pc).unwrap(); },
            LoopEnd => { pc = jumps.begin_of(pc).unwrap(); continue; },
        }
        pc += 1;
    }
    (output, cells, pointer)
}

#[test]
fn random_programs() {
    // Each fragment terminates on a tape of at least two cells.
    const FRAGMENTS: [&str; 8] = ["+", "-", ">", "<", ".", "[-]", "[->+<]", "[-<++>]"];
    let mut rng = Pcg64::seed_from_u64(0x5EED);
    for _ in 0..50 {
        let len = rng.gen_range(0..80);
        let source: String = (0..len).map(|_| FRAGMENTS[rng.gen_range(0..FRAGMENTS.len())]).collect();
        let tape_size = rng.gen_range(2..20);
        let (expected_output, expected_cells, expected_pointer) =
            interpret(&Program::parse(source.as_bytes()), tape_size);
        let (output, tape) = run_with(&source, b"", small(tape_size));
        assert_eq!(output, expected_output, "{}", source);
        assert_eq!(tape.cells(), &expected_cells[..], "{}", source);
        assert_eq!(tape.pointer(), expected_pointer, "{}", source);
    }
}
