/*!
Error command - look up error code names
*/

use cbor_print::error::{ErrorCode, print_error};
use clap::Parser;
use std::fmt::Write;

/// Look up the symbolic name of an error code
#[derive(Parser, Debug)]
#[command(about = "Print the name of an error code, or list every code", long_about = None)]
pub struct Command {
    /// Numeric error code, omit to list them all
    #[arg(allow_negative_numbers = true)]
    code: Option<i32>,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        print!("{}", describe(self.code));
        Ok(())
    }
}

fn describe(code: Option<i32>) -> String {
    let mut text = String::new();
    match code {
        Some(code) => {
            _ = print_error(&mut text, code);
        }
        None => {
            for code in ErrorCode::ALL {
                _ = writeln!(text, "{:>2} {}", i32::from(code), code.name());
            }
        }
    }
    text
}
