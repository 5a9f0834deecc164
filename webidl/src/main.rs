/* Copyright (c) 2022-2023 Jeremy Davis (jeremydavis519@gmail.com)
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the "Software"), to deal in the Software without restriction,
 * including without limitation the rights to use, copy, modify, merge, publish, distribute,
 * sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
 * NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 */

//! A diagnostic tool that parses IDL files and prints what came out.

use {
    std::{fs, path::{Path, PathBuf}, process::ExitCode},
    anyhow::Context,
    clap::{ArgAction, Parser},
    tracing_subscriber::EnvFilter,
    webidl::Definition,
};

/// Parse Web IDL files and print their ASTs
#[derive(Parser)]
#[command(version, about, arg_required_else_help(true))]
struct Cli {
    /// Print each AST as JSON instead of in Rust's debug format
    #[arg(long)]
    json: bool,
    /// Log more (repeat for even more); overridden by RUST_LOG
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// IDL files to parse. Each one is parsed on its own.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut failed = false;
    for path in &cli.files {
        println!("== {}", path.display());
        match parse_file(path).and_then(|defs| render(&defs, cli.json)) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("{}: {e:#}", path.display());
                failed = true;
            }
        }
    }

    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_file(path: &Path) -> anyhow::Result<Vec<Definition>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("couldn't read {}", path.display()))?;
    Ok(webidl::parse(&source)?)
}

fn render(defs: &[Definition], json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(defs)?)
    } else {
        Ok(format!("{defs:#?}"))
    }
}
