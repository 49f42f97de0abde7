use alloc::string::{String, ToString};

/// Rendering mode for [`crate::print::Printer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Raw header bytes and a parenthesised value, no colors
    #[default]
    Plain,

    /// Color-coded header, value and description, with type mnemonics
    Pretty,
}

/// ANSI escape sequences used by the pretty mode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Colors {
    // The initial header byte, default red
    pub header: String,

    // Any further header bytes, default blue
    pub value: String,

    // The parenthesised description, default green
    pub desc: String,

    // Tag numbers, default yellow
    pub tag: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            header: "\x1B[31m".to_string(),
            value: "\x1B[34m".to_string(),
            desc: "\x1B[32m".to_string(),
            tag: "\x1B[33m".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub mode: Mode,

    pub colors: Colors,
}
