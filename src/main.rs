use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use vbf::{compile_with, parse_requirements, tape, MappingRequirement, SearchOptions};

const LONG_ABOUT: &str = "Compile variable-BF to brainfuck, choosing the variable-to-cell assignment
that gives the shortest program.

Mapping requirements are a comma-separated list of pairs of variable names
(characters) and required locations (integers), e.g. a:0,b:1.
Most useful: mapping n vars to 0..n, or to k-n..k-1 for k = number of vars.";

#[derive(Parser, Debug)]
#[command(
    name = "vbfc",
    version,
    about = "Variable-BF to brainfuck compiler",
    long_about = LONG_ABOUT
)]
struct Cli {
    /// Variable-BF source file
    #[arg(value_name = "FILE")]
    input: PathBuf,
    /// Write the generated program to FILE
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,
    /// Mapping requirements, e.g. a:0,b:1
    #[arg(short = 'r', long = "require", value_name = "REQUIREMENTS")]
    requirements: Option<String>,
    /// Overwrite the output file without asking
    #[arg(short = 'f', long = "force", action = ArgAction::SetTrue)]
    force: bool,
    /// Evaluate candidates in parallel
    #[arg(short = 'j', long = "parallel", action = ArgAction::SetTrue)]
    parallel: bool,
    /// Only try the first N assignments (result may not be optimal)
    #[arg(long = "limit", value_name = "N")]
    limit: Option<u64>,
    /// Run the generated program, reading input from stdin
    #[arg(long = "run", action = ArgAction::SetTrue)]
    run: bool,
    /// Trace every candidate to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("Output file ({:?}) already exists. Overwrite? (y/N) ", path);
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().lock().read_line(&mut response)?;
    Ok(matches!(response.chars().next(), Some('y' | 'Y')))
}

// Creates the file, asking before replacing an existing one.
// Returns false if the user declined.
fn write_output(path: &Path, program: &str, force: bool) -> Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            if !force && !confirm_overwrite(path)? {
                return Ok(false);
            }
            fs::File::create(path)
                .with_context(|| format!("Could not open output file: {:?}", path))?
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Could not open output file: {:?}", path))
        }
    };
    file.write_all(program.as_bytes())
        .with_context(|| format!("Could not write output file: {:?}", path))?;
    Ok(true)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let requirements = match &cli.requirements {
        Some(spec) => parse_requirements(spec)?,
        None => MappingRequirement::new(),
    };
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("File not found: {:?}", cli.input))?;

    let options = SearchOptions {
        parallel: cli.parallel,
        limit: cli.limit,
        verbose: cli.verbose,
    };
    let result = compile_with(&source, &requirements, &options)?;
    println!("{} length = {}", result.map, result.program.chars().count());

    if let Some(path) = &cli.output {
        if !write_output(path, &result.program, cli.force)? {
            process::exit(1);
        }
    }

    if cli.run {
        let mut input = Vec::new();
        io::stdin().read_to_end(&mut input)?;
        let output = tape::execute(&result.program, &input)?;
        io::stdout().write_all(&output)?;
    }

    Ok(())
}
