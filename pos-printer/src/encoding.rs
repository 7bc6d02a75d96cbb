//! Code page utilities for thermal printers
//!
//! Receipt printers sold for small restaurants default to a single-byte
//! Western code page. This module provides:
//! - Column width helpers (one column per character)
//! - Converting UTF-8 to Windows-1252 while preserving ESC/POS commands

use tracing::instrument;

/// ESC t 16 - select code page WPC1252
const SELECT_CP1252: [u8; 3] = [0x1B, 0x74, 16];

/// Printed in place of '₹', which no single-byte code page carries
const RUPEE_FALLBACK: &str = "Rs.";

/// Number of printer columns a string occupies
pub fn text_width(s: &str) -> usize {
    s.chars()
        .map(|c| if c == '₹' { RUPEE_FALLBACK.len() } else { 1 })
        .sum()
}

/// Truncate a string to fit within a column width
pub fn truncate_text(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let char_len = text_width(c.encode_utf8(&mut [0; 4]));
        if width + char_len > max_width {
            break;
        }
        result.push(c);
        width += char_len;
    }
    result
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_text(s: &str, width: usize, align_right: bool) -> String {
    let current_width = text_width(s);
    if current_width >= width {
        return truncate_text(s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to Windows-1252
///
/// ASCII bytes (0x00-0x7F) pass through untouched so ESC/POS commands
/// survive. Runs of non-ASCII bytes are decoded as UTF-8 and re-encoded;
/// characters outside the code page become '?'.
///
/// The code page is selected at the start and again after every INIT
/// command (ESC @), which resets it.
#[instrument(skip(bytes))]
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() + 8);
    result.extend_from_slice(&SELECT_CP1252);

    let mut buffer = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == 0x40 {
            flush_buffer(&mut buffer, &mut result);
            result.extend_from_slice(&[0x1B, 0x40]);
            result.extend_from_slice(&SELECT_CP1252);
            i += 2;
            continue;
        }

        // GS ( k pL pH <payload>: 2D code data, copied verbatim
        if b == 0x1D && i + 4 < bytes.len() && bytes[i + 1] == 0x28 && bytes[i + 2] == 0x6B {
            flush_buffer(&mut buffer, &mut result);
            let len = bytes[i + 3] as usize | (bytes[i + 4] as usize) << 8;
            let end = (i + 5 + len).min(bytes.len());
            result.extend_from_slice(&bytes[i..end]);
            i = end;
            continue;
        }

        if b < 128 {
            flush_buffer(&mut buffer, &mut result);
            result.push(b);
        } else {
            buffer.push(b);
        }
        i += 1;
    }

    flush_buffer(&mut buffer, &mut result);
    result
}

/// Flush the non-ASCII buffer, converting UTF-8 to Windows-1252
fn flush_buffer(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }

    let s = String::from_utf8_lossy(buffer);
    for c in s.chars() {
        if c == '₹' {
            result.extend_from_slice(RUPEE_FALLBACK.as_bytes());
            continue;
        }
        let mut tmp = [0; 4];
        let (encoded, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut tmp));
        if had_errors {
            result.push(b'?');
        } else {
            result.extend_from_slice(&encoded);
        }
    }
    buffer.clear();
}
