use std::io::{self, Read};
use std::path::{PathBuf};
use std::process::{ExitCode};

use clap::{Parser, ValueEnum};
use tracing::{info};
use tracing_subscriber::{EnvFilter};

use bfjit::{Config, EofPolicy, Jit, Program};

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Eof {
    /** Leave the cell unchanged. */
    Unchanged,
    /** Store 0. */
    Zero,
    /** Store 255. */
    Max,
}

impl From<Eof> for EofPolicy {
    fn from(eof: Eof) -> Self {
        match eof {
            Eof::Unchanged => EofPolicy::Unchanged,
            Eof::Zero => EofPolicy::Zero,
            Eof::Max => EofPolicy::Max,
        }
    }
}

/** Compile a Brainfuck program to native code and run it. */
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /** The program. Reads standard input if absent. */
    file: Option<PathBuf>,

    /** The number of cells on the tape. */
    #[arg(long, default_value_t = bfjit::config::DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /** What `,` does at end of input. */
    #[arg(long, value_enum, default_value_t = Eof::Unchanged)]
    eof: Eof,

    /** Print instruction counts to standard error before running. */
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bfjit: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let source = match &args.file {
        Some(path) => std::fs::read(path)
            .map_err(|e| format!("{}: {}", path.display(), e))?,
        None => {
            let mut source = Vec::new();
            io::stdin().read_to_end(&mut source)?;
            source
        },
    };
    let program = Program::parse(&source);
    if args.stats {
        eprintln!("{}", program.stats());
    }
    let config = Config {tape_size: args.tape_size, eof: args.eof.into()};
    let jit = Jit::new(&program, config)?;
    info!(bytes = jit.code().len(), "compiled");
    let stdin = io::stdin();
    let stdout = io::stdout();
    jit.run(&mut stdin.lock(), &mut stdout.lock())?;
    Ok(())
}
