/*!
Print command - render CBOR data as an indented tree
*/

use super::io::{Input, Output};
use super::settings::Settings;
use anyhow::Context;
use cbor_print::{config::Mode, decode, print::Printer};
use clap::Parser;
use tracing::{info, warn};

/// Render CBOR data as an indented tree of headers and values
#[derive(Parser, Debug)]
#[command(about = "Render CBOR data as an indented tree", long_about = None)]
pub struct Command {
    /// Rendering mode, overriding the configured one
    #[arg(short, long, value_name = "MODE")]
    mode: Option<RenderMode>,

    /// Read the input as hex text rather than raw bytes
    #[arg(short = 'x', long)]
    hex: bool,

    /// Render every item of a CBOR sequence, not just the first
    #[arg(short, long)]
    sequence: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum RenderMode {
    /// Header bytes and raw values
    Plain,
    /// Colors, type mnemonics and named simple values
    Pretty,
}

impl From<RenderMode> for Mode {
    fn from(value: RenderMode) -> Self {
        match value {
            RenderMode::Plain => Mode::Plain,
            RenderMode::Pretty => Mode::Pretty,
        }
    }
}

impl Command {
    pub fn exec(self, settings: &Settings) -> anyhow::Result<()> {
        let data = self.input.read_bytes(self.hex)?;
        if data.is_empty() {
            anyhow::bail!("{} is empty", self.input);
        }

        let mut config = settings.printer_config();
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        let printer = Printer::new(&config);

        let text = render(&printer, &data, self.sequence)?;
        self.output.unwrap_or_default().write_str(&text)
    }
}

fn render(printer: &Printer, data: &[u8], sequence: bool) -> anyhow::Result<String> {
    let mut text = String::new();
    let mut offset = 0;
    let mut items = 0usize;
    while offset < data.len() {
        let (element, len) = decode::parse_partial(&data[offset..]).with_context(|| {
            format!("Failed to decode item {items} at offset {offset}")
        })?;
        printer
            .print(&mut text, &element)
            .context("Failed to render item")?;

        offset += len;
        items += 1;
        if !sequence {
            break;
        }
    }

    if sequence {
        info!("Rendered {items} items");
    } else if offset < data.len() {
        warn!(
            "Ignoring {} trailing bytes after the first item, use --sequence to render them",
            data.len() - offset
        );
    }
    Ok(text)
}
