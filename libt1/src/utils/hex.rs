//! Hexadecimal helpers used for tracing frames.

use std::fmt::Write;

/// Lowercase hex without separators, `[0xde, 0xad]` -> `"dead"`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}

/// Lowercase hex with one space between bytes, `[0xde, 0xad]` -> `"de ad"`.
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for b in bytes {
        if !s.is_empty() {
            s.push(' ');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Multi-line dump, `width` bytes per line with the offset in front.
pub fn hexdump(bytes: &[u8], width: usize) -> String {
    let width = width.max(1);
    let mut s = String::new();
    for (line, chunk) in bytes.chunks(width).enumerate() {
        if line != 0 {
            s.push('\n');
        }
        let _ = write!(&mut s, "{:04x}: {}", line * width, bytes_to_hex_spaced(chunk));
    }
    s
}
