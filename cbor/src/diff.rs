/*!
Side-by-side hex dumps of two buffers, for tracking down where an encoding
differs from the expected bytes.

Every 16-byte window is written as three lines: the bytes of `a`, the bytes
of `b`, and a `1`/`0` map of which positions differ, followed by a blank
line. `size` is clamped to the shorter of the two buffers.
*/

use core::fmt::{self, Write};

const COLUMN_WIDTH: usize = 16;

fn windows<'a>(
    a: &'a [u8],
    b: &'a [u8],
    size: usize,
) -> impl Iterator<Item = (usize, &'a [u8], &'a [u8])> {
    let size = size.min(a.len()).min(b.len());
    a[..size]
        .chunks(COLUMN_WIDTH)
        .zip(b[..size].chunks(COLUMN_WIDTH))
        .enumerate()
        .map(|(i, (a, b))| (i, a, b))
}

fn compare_lines(sink: &mut dyn Write, a: &[u8], b: &[u8]) -> fmt::Result {
    for byte in a {
        write!(sink, "{byte:x} ")?;
    }
    sink.write_char('\n')?;
    for byte in b {
        write!(sink, "{byte:x} ")?;
    }
    sink.write_char('\n')?;
    for (x, y) in a.iter().zip(b) {
        write!(sink, "{:x} ", (x != y) as u8)?;
    }
    sink.write_str("\n\n")
}

fn segment(sink: &mut dyn Write, line: usize, a: &[u8], b: &[u8]) -> fmt::Result {
    writeln!(sink, "line {line} (char {})", line * COLUMN_WIDTH)?;
    compare_lines(sink, a, b)
}

/// Dump both buffers window by window.
pub fn dump(sink: &mut dyn Write, a: &[u8], b: &[u8], size: usize) -> fmt::Result {
    for (_, a, b) in windows(a, b, size) {
        compare_lines(sink, a, b)?;
    }
    Ok(())
}

/// Dump both buffers with a numbered `line N (char offset)` header in
/// front of every window.
pub fn dump_segmented(sink: &mut dyn Write, a: &[u8], b: &[u8], size: usize) -> fmt::Result {
    for (line, a, b) in windows(a, b, size) {
        segment(sink, line, a, b)?;
    }
    sink.write_char('\n')
}

/// As [`dump_segmented`], but only the windows that differ. Writes nothing
/// at all if the buffers are equal.
pub fn dump_diff_only(sink: &mut dyn Write, a: &[u8], b: &[u8], size: usize) -> fmt::Result {
    let mut printed = false;
    for (line, a, b) in windows(a, b, size) {
        if a != b {
            segment(sink, line, a, b)?;
            printed = true;
        }
    }
    if printed {
        sink.write_char('\n')?;
    }
    Ok(())
}
