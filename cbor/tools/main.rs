/*!
cbor-print - render CBOR data as an indented tree of header bytes and values

# Commands

- `print`: Render the first item (or every item, with `--sequence`) of a CBOR input
- `diff`: Hex dump two buffers side by side, marking the bytes that differ
- `error`: Look up the symbolic name of an error code, or list them all

# Examples

```bash
# Render a CBOR file
cbor-print print bundle.cbor

# Render hex text from stdin, color-coded
echo 'a201f502f4' | cbor-print print --hex --mode pretty -

# Show only the 16-byte lines where two encodings differ
cbor-print diff --diff-only expected.cbor actual.cbor

# What is error code 10?
cbor-print error 10
```
*/

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

mod diff;
mod error;
mod io;
mod print;
mod settings;

/// A CLI tool for rendering CBOR data for human inspection
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render CBOR items as indented, annotated trees",
    long_about = "cbor-print renders CBOR (Concise Binary Object Representation) data as an \
                  indented tree of raw header bytes and decoded values.\n\n\
                  Features:\n\
                  - Plain or color-coded rendering\n\
                  - Byte strings holding a complete CBOR item are rendered as that item too\n\
                  - Malformed input is rendered up to the point of failure\n\
                  - Side-by-side hex comparison of two encodings"
)]
struct Cli {
    /// Output additional information to stderr, default 'trace'
    #[arg(
        short,
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "trace"
    )]
    verbose: Option<settings::Verbosity>,

    /// Use a custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render CBOR data as an indented tree
    Print(print::Command),

    /// Compare two buffers as side-by-side hex dumps
    Diff(diff::Command),

    /// Print the symbolic name of an error code
    Error(error::Command),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, source) = settings::Settings::load(cli.config.as_deref())?;
    settings::init_logger(cli.verbose.or(settings.log_level).map(tracing::Level::from));
    info!("{source}");

    match cli.command {
        Commands::Print(args) => args.exec(&settings),
        Commands::Diff(args) => args.exec(),
        Commands::Error(args) => args.exec(),
    }
}
