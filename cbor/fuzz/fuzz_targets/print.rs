#![no_main]

use cbor_print::{config::Colors, decode, print::Printer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok((element, _)) = decode::parse_partial(data) {
        _ = Printer::plain().print_to_string(&element);
        _ = Printer::pretty(Colors::default()).print_to_string(&element);
    }
});
