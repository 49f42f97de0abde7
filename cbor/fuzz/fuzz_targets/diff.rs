#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (a, b) = data.split_at(data.len() / 2);
    let mut s = String::new();
    _ = cbor_print::diff::dump_segmented(&mut s, a, b, data.len());
    s.clear();
    _ = cbor_print::diff::dump_diff_only(&mut s, a, b, data.len());
});
