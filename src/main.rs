use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use civet::runtime;

#[derive(Debug, ClapParser)]
#[command(
    name = "civet",
    about = "Interprets a small C subset: runs main() from <prefix><index>.c.",
    version
)]
struct Args {
    /// Test-file prefix; the interpreter runs `<prefix><index>.c`.
    prefix: String,

    /// Test-file index; read interactively from stdin when omitted.
    index: Option<u32>,

    /// Pretty-print the resolved AST before execution.
    #[arg(long)]
    print_ast: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let index = match args.index {
        Some(index) => index,
        None => prompt_index()?,
    };
    let path = format!("{}{}.c", args.prefix, index);
    let source =
        fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;

    let unit = match runtime::load_source(&source) {
        Ok(unit) => unit,
        Err(err) => return Err(report(err)),
    };
    if args.print_ast {
        println!("{unit:#?}");
    }
    match runtime::run_unit(&unit, io::stdin().lock(), io::stderr()) {
        Ok(()) => Ok(()),
        Err(err) => Err(report(err)),
    }
}

fn report(err: civet::interpreter::CivetError) -> anyhow::Error {
    eprintln!("{err}");
    anyhow!("interpreter failed with {}", err.code_str())
}

fn prompt_index() -> Result<u32> {
    eprint!("Input the test-file index : ");
    io::stderr().flush().context("failed to flush stderr")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read index from stdin")?;
    line.trim()
        .parse::<u32>()
        .context("the index must be a non-negative integer")
}
