/*!
Recursive, indented rendering of decoded CBOR items.

Each item is rendered as its header bytes followed by a parenthesised
description. Tags are written in front of the item they apply to, strings
and collections are walked depth first with one level of `| ` indentation
per nesting level, and byte strings are hex dumped and then, if their
payload is exactly one CBOR item, rendered again as that item.

```
use cbor_print::{decode, print::Printer};

let (element, _) = decode::parse_element(&[0x82, 0x01, 0x20]).unwrap();
let text = Printer::plain().print_to_string(&element);
assert_eq!(text, "0x82 (2)\n| 0x01 (1)\n| 0x20 (-1)\n");
```

Decode failures inside the tree never fail the print: they are written
inline as `Could not print (<error name>)` and the walk carries on with
the next sibling of the broken collection.
*/

use super::config::{Colors, Config, Mode};
use super::decode::{self, Decoder, Element, Item, Major, Special};
use super::error;
use alloc::{boxed::Box, string::String};
use core::fmt::{self, Write};
use tracing::{debug, trace};

const BYTES_PER_LINE: usize = 16;
const RESET_COLOR: &str = "\x1B[0m";

/// The output sink, and whether the current line has been indented yet.
///
/// A fresh `Line` is created for every top-level print, so no indentation
/// state survives between calls.
pub struct Line<'w> {
    sink: &'w mut dyn Write,
    indented: bool,
}

impl<'w> Line<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self {
            sink,
            indented: false,
        }
    }

    /// Write the indentation for `depth`, at most once per line.
    pub fn indent(&mut self, depth: usize) -> fmt::Result {
        if !self.indented {
            for _ in 0..depth {
                self.sink.write_str("| ")?;
            }
            self.indented = true;
        }
        Ok(())
    }

    pub fn newline(&mut self) -> fmt::Result {
        self.indented = false;
        self.sink.write_char('\n')
    }

    /// Hex dump `bytes`, 16 to a line, each line indented and prefixed
    /// with `0x`. The last line is left open.
    pub fn hex(&mut self, bytes: &[u8], depth: usize) -> fmt::Result {
        for (i, chunk) in bytes.chunks(BYTES_PER_LINE).enumerate() {
            if i > 0 {
                self.newline()?;
            }
            self.indent(depth)?;
            self.sink.write_str("0x")?;
            for b in chunk {
                write!(self.sink, "{b:02x} ")?;
            }
        }
        Ok(())
    }

    /// Write `text` in quotes, re-indenting after every embedded line break.
    pub fn quoted(&mut self, text: &[u8], depth: usize) -> fmt::Result {
        self.indent(depth)?;
        self.sink.write_char('"')?;
        for (i, line) in text.split(|b| *b == b'\n').enumerate() {
            if i > 0 {
                self.newline()?;
                self.indent(depth)?;
            }
            self.lossy(line)?;
        }
        self.sink.write_char('"')?;
        self.newline()
    }

    fn lossy(&mut self, bytes: &[u8]) -> fmt::Result {
        for chunk in bytes.utf8_chunks() {
            self.sink.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                self.sink.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}

impl Write for Line<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sink.write_str(s)
    }
}

/// How tags, headers and end markers are presented.
pub trait Style {
    /// Write one tag number, leaving the line open for the tagged item.
    fn tag(&self, out: &mut Line<'_>, tag: u64, depth: usize) -> fmt::Result;

    /// Write the header and description line of `element`.
    fn value(&self, out: &mut Line<'_>, element: &Element<'_>, depth: usize) -> fmt::Result;

    /// Write the end marker line of an indefinite-length item.
    fn end(&self, out: &mut Line<'_>, major: Major, depth: usize) -> fmt::Result;
}

/// Uncolored header bytes with the decimal value.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl Style for Plain {
    fn tag(&self, out: &mut Line<'_>, tag: u64, depth: usize) -> fmt::Result {
        out.indent(depth)?;
        write!(out, "0x{tag:02x} ")
    }

    fn value(&self, out: &mut Line<'_>, element: &Element<'_>, depth: usize) -> fmt::Result {
        out.hex(element.header(), depth)?;
        match element.item() {
            _ if element.is_indefinite() => out.write_str("(start)")?,
            Item::Negative(_) => write!(out, "({})", element.neg_value())?,
            _ => write!(out, "({})", element.value())?,
        }
        out.newline()
    }

    fn end(&self, out: &mut Line<'_>, _major: Major, depth: usize) -> fmt::Result {
        out.indent(depth)?;
        out.write_str("0xff (end)")?;
        out.newline()
    }
}

/// Color-coded output with type mnemonics and named simple values.
#[derive(Debug, Default, Clone)]
pub struct Pretty {
    colors: Colors,
}

impl Pretty {
    pub fn new(colors: Colors) -> Self {
        Self { colors }
    }
}

impl Style for Pretty {
    fn tag(&self, out: &mut Line<'_>, tag: u64, depth: usize) -> fmt::Result {
        out.indent(depth)?;
        write!(out, "{}0x{tag:02x} {RESET_COLOR}", self.colors.tag)
    }

    fn value(&self, out: &mut Line<'_>, element: &Element<'_>, depth: usize) -> fmt::Result {
        out.indent(depth)?;
        if let Some((initial, rest)) = element.header().split_first() {
            write!(
                out,
                "{}0x{initial:02x} {}",
                self.colors.header, self.colors.value
            )?;
            out.hex(rest, 0)?;
        }
        write!(out, "{}(", self.colors.desc)?;

        match element.item() {
            Item::Unsigned(v) => write!(out, "{v}")?,
            Item::Negative(_) => write!(out, "{}", element.neg_value())?,
            Item::Bytes(len) | Item::Text(len) | Item::Array(len) | Item::Map(len) => {
                let mnemonic = element.major().mnemonic();
                match len {
                    Some(len) => write!(out, "{mnemonic}<{len}>")?,
                    None => out.write_str(mnemonic)?,
                }
            }
            Item::Simple(special) => write_special(out, special)?,
            Item::Tag(_) => {}
        }

        write!(out, "){RESET_COLOR}")?;
        out.newline()
    }

    fn end(&self, out: &mut Line<'_>, major: Major, depth: usize) -> fmt::Result {
        out.indent(depth)?;
        write!(
            out,
            "{}0xff {}({} end){RESET_COLOR}",
            self.colors.header,
            self.colors.desc,
            major.mnemonic()
        )?;
        out.newline()
    }
}

fn write_special(out: &mut Line<'_>, special: Special) -> fmt::Result {
    match special {
        Special::False => out.write_str("false"),
        Special::True => out.write_str("true"),
        Special::Null => out.write_str("null"),
        Special::Undefined => out.write_str("undefined"),
        Special::Simple(v) => write!(out, "simple<{v}>"),
        Special::Float16(v) => write_float(out, v.to_f64()),
        Special::Float32(v) => write_float(out, v as f64),
        Special::Float64(v) => write_float(out, v),
    }
}

fn write_float(out: &mut Line<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        out.write_str(if v.is_sign_negative() { "-nan" } else { "nan" })
    } else {
        write!(out, "{v:.6}")
    }
}

/// Renders element trees with one [`Style`].
pub struct Printer {
    style: Box<dyn Style>,
}

impl Default for Printer {
    fn default() -> Self {
        Self::plain()
    }
}

impl Printer {
    pub fn new(config: &Config) -> Self {
        match config.mode {
            Mode::Plain => Self::plain(),
            Mode::Pretty => Self::pretty(config.colors.clone()),
        }
    }

    pub fn plain() -> Self {
        Self::with_style(Plain)
    }

    pub fn pretty(colors: Colors) -> Self {
        Self::with_style(Pretty::new(colors))
    }

    pub fn with_style<S: Style + 'static>(style: S) -> Self {
        Self {
            style: Box::new(style),
        }
    }

    /// Render `element` and everything nested in it to `sink`.
    ///
    /// Only a failing sink produces an error; problems in the encoded data
    /// are written out inline.
    pub fn print(&self, sink: &mut dyn Write, element: &Element<'_>) -> fmt::Result {
        let mut out = Line::new(sink);
        self.print_element(&mut out, element, 0)
    }

    pub fn print_to_string(&self, element: &Element<'_>) -> String {
        let mut s = String::new();
        // Writing to a String cannot fail
        _ = self.print(&mut s, element);
        s
    }

    fn print_element(&self, out: &mut Line<'_>, element: &Element<'_>, depth: usize) -> fmt::Result {
        let mut decoder = Decoder::new(element.encoded());
        while let Some(tag) = decoder.tag() {
            self.style.tag(out, tag, depth)?;
        }

        self.style.value(out, element, depth)?;
        decoder.seek(element.payload_offset());

        match element.item() {
            Item::Bytes(Some(len)) | Item::Text(Some(len)) if is_short(element, len) => {
                let payload = element.payload();
                if element.major() == Major::Bytes {
                    if !payload.is_empty() {
                        out.hex(payload, depth + 1)?;
                        out.newline()?;
                    }
                } else {
                    out.quoted(payload, depth + 1)?;
                }
                self.failure(out, element, decode::Error::NotEnoughData, depth)
            }
            Item::Bytes(Some(_)) => self.print_bytes(out, element.payload(), depth + 1),
            Item::Text(Some(_)) => out.quoted(element.payload(), depth + 1),
            Item::Bytes(None) | Item::Text(None) | Item::Array(_) | Item::Map(_) => {
                self.print_items(out, decoder, element, depth)
            }
            Item::Unsigned(_) | Item::Negative(_) | Item::Tag(_) | Item::Simple(_) => Ok(()),
        }
    }

    fn print_bytes(&self, out: &mut Line<'_>, payload: &[u8], depth: usize) -> fmt::Result {
        if payload.is_empty() {
            return Ok(());
        }
        out.hex(payload, depth)?;
        out.newline()?;

        // Opaque byte strings are common, so a failed decode is not an error
        match decode::try_parse_element(payload) {
            Ok(Some((embedded, len))) if len == payload.len() => {
                self.print_element(out, &embedded, depth)
            }
            _ => Ok(()),
        }
    }

    fn print_items(
        &self,
        out: &mut Line<'_>,
        mut decoder: Decoder<'_>,
        element: &Element<'_>,
        depth: usize,
    ) -> fmt::Result {
        decoder.expect_items(match element.item() {
            Item::Array(Some(count)) => Some(count),
            Item::Map(Some(count)) => Some(count.saturating_mul(2)),
            _ => None,
        });

        let chunked = matches!(element.major(), Major::Bytes | Major::Text);
        loop {
            match decoder.element() {
                Ok(child) if chunked && !is_chunk(&child, element.major()) => {
                    self.failure(out, element, decode::Error::InvalidChunk, depth)?;
                    break;
                }
                Ok(child) => self.print_element(out, &child, depth + 1)?,
                Err(_) if decoder.at_end() => {
                    trace!("End of {} at depth {depth}", element.major().mnemonic());
                    break;
                }
                Err(e) => {
                    self.failure(out, element, e, depth)?;
                    break;
                }
            }
        }

        if element.is_indefinite() {
            self.style.end(out, element.major(), depth)?;
        }
        Ok(())
    }

    /// Write the inline failure line for the content of `element`.
    fn failure(
        &self,
        out: &mut Line<'_>,
        element: &Element<'_>,
        e: decode::Error,
        depth: usize,
    ) -> fmt::Result {
        debug!("Could not print {} content: {e}", element.major().mnemonic());
        out.indent(depth + 1)?;
        write!(
            out,
            "Could not print ({})",
            error::error_name(e.code().into())
        )?;
        out.newline()
    }
}

/// True if a definite-length string holds fewer bytes than its header
/// declares, as left by [`decode::parse_partial`] on truncated input.
fn is_short(element: &Element<'_>, len: u64) -> bool {
    usize::try_from(len).map_or(true, |len| element.payload().len() < len)
}

/// A chunk of an indefinite-length string is an untagged definite-length
/// string of the same major type.
fn is_chunk(child: &Element<'_>, major: Major) -> bool {
    child.major() == major && !child.is_indefinite() && child.header_offset() == 0
}

/// Render `element` with the plain style.
pub fn print(sink: &mut dyn Write, element: &Element<'_>) -> fmt::Result {
    Printer::plain().print(sink, element)
}

/// Hex dump `bytes` as the printer does for byte strings, closing the
/// last line.
pub fn hex_dump(sink: &mut dyn Write, bytes: &[u8], depth: usize) -> fmt::Result {
    let mut out = Line::new(sink);
    out.hex(bytes, depth)?;
    if !bytes.is_empty() {
        out.newline()?;
    }
    Ok(())
}
