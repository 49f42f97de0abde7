/*!
Diff command - compare two buffers as side-by-side hex dumps
*/

use super::io::{Input, Output};
use anyhow::Context;
use cbor_print::diff;
use clap::Parser;
use std::fmt;
use tracing::{info, warn};

type DumpFn = fn(&mut dyn fmt::Write, &[u8], &[u8], usize) -> fmt::Result;

/// Compare two buffers 16 bytes at a time
#[derive(Parser, Debug)]
#[command(about = "Compare two buffers as side-by-side hex dumps", long_about = None)]
pub struct Command {
    /// Prefix every 16-byte line with its line number and offset
    #[arg(short, long, conflicts_with = "diff_only")]
    all: bool,

    /// Only show the 16-byte lines that differ
    #[arg(short, long)]
    diff_only: bool,

    /// Read both inputs as hex text rather than raw bytes
    #[arg(short = 'x', long)]
    hex: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Expected data (use '-' for stdin)
    expected: Input,

    /// Actual data
    actual: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let a = self.expected.read_bytes(self.hex)?;
        let b = self.actual.read_bytes(self.hex)?;
        if a.len() != b.len() {
            warn!(
                "Lengths differ, {} is {} bytes and {} is {} bytes, comparing the first {}",
                self.expected,
                a.len(),
                self.actual,
                b.len(),
                a.len().min(b.len())
            );
        }

        let mut text = String::new();
        let size = a.len().max(b.len());
        let dump: DumpFn = if self.all {
            diff::dump_segmented
        } else if self.diff_only {
            diff::dump_diff_only
        } else {
            diff::dump
        };
        dump(&mut text, &a, &b, size).context("Failed to format comparison")?;

        if text.is_empty() {
            info!("Inputs are identical");
        }
        self.output.unwrap_or_default().write_str(&text)
    }
}
