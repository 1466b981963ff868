//! CLI entry point: parses arguments and drives the enumerator.
//!
//! Argument parsing, coarse work-splitting, and output-path formatting are
//! thin wrappers around [`lextet::driver::run`] — the CLI's job is to
//! validate and translate, not to know anything about the search itself.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use lextet::driver::{self, RunConfig};

#[derive(Parser, Debug)]
#[command(
    name = "lextet",
    about = "Isomorph-free enumeration of triangulated 3-dimensional normal pseudomanifolds"
)]
struct Args {
    /// Number of vertices to enumerate triangulations on.
    nv: usize,

    /// Only search for irreducible triangulations (no contractible edges).
    #[arg(short = 'i', long)]
    irreducible: bool,

    /// Directory to write classified output files into.
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// This run's residue in a `res mod modulus` coarse split across processes.
    #[arg(short = 'r', long, default_value_t = 0)]
    res: usize,

    /// Modulus of the coarse split; `1` runs the whole search in this process.
    #[arg(short = 'm', long, default_value_t = 1)]
    modulus: usize,

    /// Log a summary of the run (triangulation counts per bucket, search
    /// statistics) once it finishes.
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // clap's own `--help`/`-h` handling exits 0; this CLI's help request
    // always exited 1, so it's intercepted here before clap gets to parse.
    if std::env::args().skip(1).any(|a| a == "-h" || a == "--help") {
        print_help();
        return ExitCode::from(1);
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    use clap::CommandFactory;
    let mut cmd = Args::command();
    let _ = cmd.print_help();
    println!();
}

fn run() -> Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.modulus > 0, "modulus must be at least 1");
    anyhow::ensure!(args.res < args.modulus, "res must be less than modulus");

    let config = RunConfig {
        nv: args.nv,
        only_irreducible: args.irreducible,
        res: args.res,
        modulus: args.modulus,
        output_dir: args.output_dir,
    };
    let summary = driver::run(&config)?;
    if args.verbose {
        summary.log();
    }
    Ok(())
}
