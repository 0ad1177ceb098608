//! kgrep: print lines that match a pattern
//!
//! Usage: kgrep [-o] [-r] [--color[=WHEN]] -E PATTERN [PATH...]
//!
//! Exits with 0 if any line matched, 1 if none did, and 2 on a usage error,
//! an invalid pattern, or an unreadable input.

use std::process;

use anyhow::Context;

mod args;
mod input;
mod printer;
mod search;

use args::Args;
use input::Inputs;
use printer::Printer;
use search::Searcher;

fn main() {
    env_logger::init();

    let code = match run() {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("kgrep: {:#}", err);
            2
        }
    };
    process::exit(code);
}

fn run() -> anyhow::Result<bool> {
    let args = Args::parse()?;
    let searcher = Searcher::new(&args.pattern)?;
    let inputs = Inputs::collect(&args.paths, args.recursive)?;

    let with_path = inputs.sources.len() > 1 || inputs.walked;
    let mut printer = Printer::new(printer::color_choice(args.color), args.only_matching, with_path);

    let mut matched = false;
    for source in &inputs.sources {
        let haystack = source.read().with_context(|| format!("{}", source))?;
        let label = source.to_string();
        let count = searcher
            .search(&label, &haystack, &mut printer)
            .context("failed to write output")?;
        printer.flush().context("failed to write output")?;
        log::debug!("{}: {} matching lines", label, count);
        matched |= count > 0;
    }

    Ok(matched)
}
