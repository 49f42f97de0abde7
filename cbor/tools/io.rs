/*!
Reading CBOR from files or stdin, raw or as hex text, and writing the
rendered text out again
*/

use anyhow::Context;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Input source, `-` for stdin
#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn read_raw(&self) -> io::Result<Vec<u8>> {
        match self {
            Input::Stdin => {
                let mut buffer = Vec::new();
                io::stdin().read_to_end(&mut buffer)?;
                Ok(buffer)
            }
            Input::File(path) => fs::read(path),
        }
    }

    /// Read the whole input, decoding it from hex text if `hex` is set.
    pub fn read_bytes(&self, hex: bool) -> anyhow::Result<Vec<u8>> {
        let data = self
            .read_raw()
            .with_context(|| format!("Failed to read {self}"))?;
        debug!("Read {} bytes from {self}", data.len());

        if hex {
            decode_hex(&data).with_context(|| format!("Failed to decode hex from {self}"))
        } else {
            Ok(data)
        }
    }
}

/// Decode hex text, ignoring whitespace and an optional `0x` prefix.
pub fn decode_hex(text: &[u8]) -> anyhow::Result<Vec<u8>> {
    let text = std::str::from_utf8(text).context("Hex input is not valid UTF-8")?;
    let digits: String = text.split_whitespace().collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    Ok(hex::decode(digits)?)
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Input::Stdin)
        } else {
            Ok(Input::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::File(path) => write!(f, "'{}'", path.display()),
        }
    }
}

/// Output destination, stdout if empty or `-`
#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn write_str(&self, data: &str) -> anyhow::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data.as_bytes())?;
                stdout.flush()?;
            }
            Output::File(path) => fs::write(path, data)
                .with_context(|| format!("Failed to write '{}'", path.display()))?,
        }
        Ok(())
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "-" {
            Ok(Output::Stdout)
        } else {
            Ok(Output::File(PathBuf::from(s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_input() {
        assert_eq!(decode_hex(b"a201f502f4").unwrap(), [0xa2, 0x01, 0xf5, 0x02, 0xf4]);
        assert_eq!(decode_hex(b"0x82 01\n 02\n").unwrap(), [0x82, 0x01, 0x02]);
        assert_eq!(decode_hex(b"").unwrap(), Vec::<u8>::new());
        assert!(decode_hex(b"8").is_err());
        assert!(decode_hex(b"zz").is_err());
    }

    #[test]
    fn dash_is_stdio() {
        assert!(matches!("-".parse::<Input>().unwrap(), Input::Stdin));
        assert!(matches!("-".parse::<Output>().unwrap(), Output::Stdout));
        assert!(matches!(
            "a.cbor".parse::<Input>().unwrap(),
            Input::File(p) if p == PathBuf::from("a.cbor")
        ));
    }
}
