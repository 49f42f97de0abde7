use super::config::{Colors, Config, Mode};
use super::decode::{parse_element, parse_partial};
use super::print::*;
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;
use hex_literal::hex;

fn plain(data: &[u8]) -> String {
    let (element, _) = parse_element(data).unwrap();
    Printer::plain().print_to_string(&element)
}

fn no_colors() -> Colors {
    Colors {
        header: String::new(),
        value: String::new(),
        desc: String::new(),
        tag: String::new(),
    }
}

fn pretty(data: &[u8]) -> String {
    let (element, _) = parse_element(data).unwrap();
    Printer::pretty(no_colors())
        .print_to_string(&element)
        .replace("\x1B[0m", "")
}

#[test]
fn text_string() {
    let s = plain(&hex!("626869"));
    assert_eq!(s, "0x62 (2)\n| \"hi\"\n");
    assert!(s.ends_with("\"hi\"\n"));

    assert_eq!(pretty(&hex!("626869")), "0x62 (tstr<2>)\n| \"hi\"\n");
}

#[test]
fn text_string_line_breaks() {
    assert_eq!(plain(&hex!("64610a6263")), "0x64 (4)\n| \"a\n| bc\"\n");
    assert_eq!(
        plain(&hex!("8162610a")),
        "0x81 (1)\n| 0x62 (2)\n| | \"a\n| | \"\n"
    );
}

#[test]
fn text_string_invalid_utf8() {
    assert_eq!(plain(&hex!("62ff61")), "0x62 (2)\n| \"\u{FFFD}a\"\n");
}

#[test]
fn definite_map() {
    let data = hex!("a201f502f4");
    assert_eq!(
        plain(&data),
        "0xa2 (2)\n| 0x01 (1)\n| 0xf5 (21)\n| 0x02 (2)\n| 0xf4 (20)\n"
    );
    assert_eq!(
        pretty(&data),
        "0xa2 (map<2>)\n| 0x01 (1)\n| 0xf5 (true)\n| 0x02 (2)\n| 0xf4 (false)\n"
    );
}

#[test]
fn definite_list_child_count() {
    let s = plain(&hex!("8a0102030405060708090a"));
    assert_eq!(s.lines().filter(|l| l.starts_with("| 0x")).count(), 10);
    assert_eq!(s.lines().count(), 11);
}

#[test]
fn indefinite_list() {
    let data = hex!("9f07ff");
    assert_eq!(plain(&data), "0x9f (start)\n| 0x07 (7)\n0xff (end)\n");
    assert_eq!(pretty(&data), "0x9f (list)\n| 0x07 (7)\n0xff (list end)\n");
}

#[test]
fn indefinite_map() {
    let data = hex!("bf6161f5ff");
    assert_eq!(
        pretty(&data),
        "0xbf (map)\n| 0x61 (tstr<1>)\n| | \"a\"\n| 0xf5 (true)\n0xff (map end)\n"
    );
}

#[test]
fn nested_lists() {
    let data = hex!("8182019f02ff");
    assert_eq!(
        plain(&data),
        "0x81 (1)\n| 0x82 (2)\n| | 0x01 (1)\n| | 0x9f (start)\n| | | 0x02 (2)\n| | 0xff (end)\n"
    );
}

#[test]
fn embedded_cbor() {
    assert_eq!(
        plain(&hex!("42182a")),
        "0x42 (2)\n| 0x18 2a \n| 0x18 2a (42)\n"
    );

    // Trailing byte: hex dump only
    assert_eq!(plain(&hex!("43182a00")), "0x43 (3)\n| 0x18 2a 00 \n");

    assert_eq!(
        plain(&hex!("4483010203")),
        "0x44 (4)\n| 0x83 01 02 03 \n| 0x83 (3)\n| | 0x01 (1)\n| | 0x02 (2)\n| | 0x03 (3)\n"
    );
}

#[test]
fn opaque_bytes() {
    assert_eq!(plain(&hex!("40")), "0x40 (0)\n");
    assert_eq!(plain(&hex!("43ffffff")), "0x43 (3)\n| 0xff ff ff \n");
}

#[test]
fn long_byte_string() {
    let mut data = hex!("5820").to_vec();
    data.extend([0xffu8; 32]);
    let s = plain(&data);
    let mut lines = s.lines();
    assert_eq!(lines.next(), Some("0x58 20 (32)"));
    assert_eq!(lines.clone().count(), 2);
    assert!(lines.all(|l| l.starts_with("| 0xff ff")));
}

#[test]
fn hex_dump_lines() {
    for len in [1usize, 15, 16, 17, 32, 33, 100] {
        let bytes: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let mut s = String::new();
        hex_dump(&mut s, &bytes, 2).unwrap();
        assert_eq!(s.lines().count(), len.div_ceil(16));
        assert!(s.lines().all(|l| l.starts_with("| | 0x")));
    }

    let mut s = String::new();
    hex_dump(&mut s, &[], 0).unwrap();
    assert!(s.is_empty());
}

#[test]
fn indefinite_byte_string() {
    let data = hex!("5f42010243030405ff");
    assert_eq!(
        plain(&data),
        "0x5f (start)\n| 0x42 (2)\n| | 0x01 02 \n| 0x43 (3)\n| | 0x03 04 05 \n0xff (end)\n"
    );
    assert!(pretty(&data).ends_with("0xff (bstr end)\n"));
}

#[test]
fn integers() {
    assert_eq!(plain(&hex!("1903e8")), "0x19 03 e8 (1000)\n");
    assert_eq!(plain(&hex!("3903e7")), "0x39 03 e7 (-1000)\n");
    assert_eq!(
        plain(&hex!("3bffffffffffffffff")),
        "0x3b ff ff ff ff ff ff ff ff (-18446744073709551616)\n"
    );
    assert_eq!(pretty(&hex!("1903e8")), "0x19 0x03 e8 (1000)\n");
    assert_eq!(pretty(&hex!("20")), "0x20 (-1)\n");
}

#[test]
fn tags() {
    assert_eq!(
        plain(&hex!("c11a514b67b0")),
        "0x01 0x1a 51 4b 67 b0 (1363896240)\n"
    );
    assert_eq!(plain(&hex!("c1c200")), "0x01 0x02 0x00 (0)\n");
    assert_eq!(
        plain(&hex!("81d82001")),
        "0x81 (1)\n| 0x20 0x01 (1)\n"
    );
}

#[test]
fn simple_values() {
    assert_eq!(pretty(&hex!("f6")), "0xf6 (null)\n");
    assert_eq!(pretty(&hex!("f7")), "0xf7 (undefined)\n");
    assert_eq!(pretty(&hex!("f0")), "0xf0 (simple<16>)\n");
    assert_eq!(pretty(&hex!("f820")), "0xf8 0x20 (simple<32>)\n");
    assert_eq!(pretty(&hex!("f93c00")), "0xf9 0x3c 00 (1.000000)\n");
    assert_eq!(pretty(&hex!("f9c400")), "0xf9 0xc4 00 (-4.000000)\n");
    assert_eq!(
        pretty(&hex!("fa47c35000")),
        "0xfa 0x47 c3 50 00 (100000.000000)\n"
    );
    assert_eq!(
        pretty(&hex!("fb3ff199999999999a")),
        "0xfb 0x3f f1 99 99 99 99 99 9a (1.100000)\n"
    );

    assert_eq!(pretty(&hex!("f97e00")), "0xf9 0x7e 00 (nan)\n");
    assert_eq!(pretty(&hex!("f97c00")), "0xf9 0x7c 00 (inf)\n");
    assert_eq!(pretty(&hex!("f9fc00")), "0xf9 0xfc 00 (-inf)\n");
    assert_eq!(pretty(&hex!("fa7fc00000")), "0xfa 0x7f c0 00 00 (nan)\n");

    assert_eq!(plain(&hex!("f6")), "0xf6 (22)\n");
    assert_eq!(plain(&hex!("f93c00")), "0xf9 3c 00 (15360)\n");
}

#[test]
fn colors() {
    let (element, _) = parse_element(&hex!("820102")).unwrap();
    let s = Printer::pretty(Colors::default()).print_to_string(&element);
    assert!(s.starts_with("\x1B[31m0x82 \x1B[34m\x1B[32m(list<2>)\x1B[0m\n"));

    let (element, _) = parse_element(&hex!("c100")).unwrap();
    let s = Printer::pretty(Colors::default()).print_to_string(&element);
    assert_eq!(
        s,
        "\x1B[33m0x01 \x1B[0m\x1B[31m0x00 \x1B[34m\x1B[32m(0)\x1B[0m\n"
    );
}

#[test]
fn printer_from_config() {
    let (element, _) = parse_element(&hex!("9fff")).unwrap();

    let config = Config {
        mode: Mode::Pretty,
        colors: no_colors(),
    };
    let s = Printer::new(&config).print_to_string(&element);
    assert_eq!(s.replace("\x1B[0m", ""), "0x9f (list)\n0xff (list end)\n");

    let s = Printer::new(&Config::default()).print_to_string(&element);
    assert_eq!(s, "0x9f (start)\n0xff (end)\n");
}

#[test]
fn truncated_list() {
    let (element, _) = parse_partial(&hex!("83010243")).unwrap();
    assert_eq!(
        Printer::plain().print_to_string(&element),
        "0x83 (3)\n| 0x01 (1)\n| 0x02 (2)\n| Could not print (ZCBOR_ERR_NO_PAYLOAD)\n"
    );

    let (element, _) = parse_partial(&hex!("9f01")).unwrap();
    assert_eq!(
        Printer::plain().print_to_string(&element),
        "0x9f (start)\n| 0x01 (1)\n| Could not print (ZCBOR_ERR_NO_PAYLOAD)\n0xff (end)\n"
    );
}

#[test]
fn malformed_child() {
    let (element, _) = parse_partial(&hex!("82011c02")).unwrap();
    assert_eq!(
        Printer::plain().print_to_string(&element),
        "0x82 (2)\n| 0x01 (1)\n| Could not print (ZCBOR_ERR_ADDITIONAL_INVAL)\n"
    );
}

#[test]
fn truncated_strings() {
    let (element, _) = parse_partial(&hex!("43182a")).unwrap();
    assert_eq!(
        Printer::plain().print_to_string(&element),
        "0x43 (3)\n| 0x18 2a \n| Could not print (ZCBOR_ERR_NO_PAYLOAD)\n"
    );

    let (element, _) = parse_partial(&hex!("656869")).unwrap();
    assert_eq!(
        Printer::plain().print_to_string(&element),
        "0x65 (5)\n| \"hi\"\n| Could not print (ZCBOR_ERR_NO_PAYLOAD)\n"
    );

    let (element, _) = parse_partial(&hex!("43")).unwrap();
    assert_eq!(
        Printer::plain().print_to_string(&element),
        "0x43 (3)\n| Could not print (ZCBOR_ERR_NO_PAYLOAD)\n"
    );
}

#[test]
fn invalid_chunks() {
    let (element, _) = parse_partial(&hex!("5f01ff")).unwrap();
    assert_eq!(
        Printer::plain().print_to_string(&element),
        "0x5f (start)\n| Could not print (ZCBOR_ERR_WRONG_TYPE)\n0xff (end)\n"
    );

    // Text chunk in a byte string, after one good chunk
    let (element, _) = parse_partial(&hex!("5f41016161ff")).unwrap();
    assert_eq!(
        Printer::plain().print_to_string(&element),
        "0x5f (start)\n| 0x41 (1)\n| | 0x01 \n| | 0x01 (1)\n| Could not print (ZCBOR_ERR_WRONG_TYPE)\n0xff (end)\n"
    );

    // Nested indefinite chunk
    let (element, _) = parse_partial(&hex!("7f7f6161ffff")).unwrap();
    assert!(
        Printer::plain()
            .print_to_string(&element)
            .starts_with("0x7f (start)\n| Could not print (ZCBOR_ERR_WRONG_TYPE)\n")
    );
}

#[test]
fn free_print_function() {
    let (element, _) = parse_element(&hex!("01")).unwrap();
    let mut s = "prefix ".to_string();
    print(&mut s, &element).unwrap();
    print(&mut s, &element).unwrap();
    assert_eq!(s, "prefix 0x01 (1)\n0x01 (1)\n");
}

struct FailingSink;

impl fmt::Write for FailingSink {
    fn write_str(&mut self, _: &str) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[test]
fn sink_errors_propagate() {
    let (element, _) = parse_element(&hex!("820102")).unwrap();
    assert!(Printer::plain().print(&mut FailingSink, &element).is_err());
}
