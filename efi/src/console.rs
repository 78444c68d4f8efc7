//! ConOut text sink
//!
//! Commands write through `core::fmt::Write`; this encodes to UCS-2 in
//! fixed chunks and expands `\n` to `\r\n` for the firmware console.

use core::fmt;

use crate::uefi::text_output::SimpleTextOutputProtocol;

const CHUNK: usize = 128;

/// Encode `s` as NUL-terminated UCS-2 chunks, calling `emit` for each.
///
/// Characters outside the BMP become `?`.
fn encode_chunks<E: FnMut(&[u16])>(s: &str, mut emit: E) {
    let mut buf = [0u16; CHUNK];
    let mut len = 0;

    for ch in s.chars() {
        // Room for "\r\n" plus the terminator
        if len + 3 > CHUNK {
            buf[len] = 0;
            emit(&buf[..=len]);
            len = 0;
        }
        match ch {
            '\n' => {
                buf[len] = u16::from(b'\r');
                buf[len + 1] = u16::from(b'\n');
                len += 2;
            }
            c if (c as u32) <= 0xffff => {
                buf[len] = c as u32 as u16;
                len += 1;
            }
            _ => {
                buf[len] = u16::from(b'?');
                len += 1;
            }
        }
    }

    if len > 0 {
        buf[len] = 0;
        emit(&buf[..=len]);
    }
}

pub struct Console {
    con_out: *mut SimpleTextOutputProtocol,
}

impl Console {
    /// # Safety
    /// `con_out` must be the system table's console output protocol, or null.
    pub unsafe fn new(con_out: *mut SimpleTextOutputProtocol) -> Self {
        Self { con_out }
    }
}

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.con_out.is_null() {
            return Err(fmt::Error);
        }

        let mut result = Ok(());
        let con_out = self.con_out;
        encode_chunks(s, |chunk| {
            let status = unsafe { ((*con_out).output_string)(con_out, chunk.as_ptr()) };
            if status.is_error() {
                result = Err(fmt::Error);
            }
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn encode(s: &str) -> Vec<Vec<u16>> {
        let mut chunks = Vec::new();
        encode_chunks(s, |c| chunks.push(c.to_vec()));
        chunks
    }

    #[test]
    fn test_newline_expanded() {
        let chunks = encode("ok\n");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], [b'o' as u16, b'k' as u16, 0x0d, 0x0a, 0]);
    }

    #[test]
    fn test_empty_emits_nothing() {
        assert!(encode("").is_empty());
    }

    #[test]
    fn test_long_line_split_into_terminated_chunks() {
        let line: std::string::String = core::iter::repeat('x').take(300).collect();
        let chunks = encode(&line);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= CHUNK);
            assert_eq!(chunk.last(), Some(&0));
        }
        let total: usize = chunks.iter().map(|c| c.len() - 1).sum();
        assert_eq!(total, 300);
    }

    #[test]
    fn test_non_bmp_replaced() {
        let chunks = encode("a\u{1f600}");
        assert_eq!(chunks[0], [b'a' as u16, b'?' as u16, 0]);
    }
}
