//! Wide (UCS-2) to narrow variable name conversion
//!
//! Firmware names are CHAR16 strings. Everything printed or compared by
//! this tool is plain ASCII in practice, so each unit is truncated to its
//! low byte. Characters above U+00FF do not survive the trip.

use core::fmt;

use crate::error::NameError;

/// A decoded name borrowed from the caller's narrow buffer.
///
/// The byte after the last name byte in that buffer is always NUL.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NarrowName<'a> {
    bytes: &'a [u8],
}

impl<'a> NarrowName<'a> {
    /// Name bytes without the terminator
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte-wise comparison with an operator supplied name
    pub fn matches(&self, name: &str) -> bool {
        self.bytes == name.as_bytes()
    }
}

impl fmt::Display for NarrowName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for &b in self.bytes {
            f.write_char(b as char)?; // Latin-1
        }
        Ok(())
    }
}

impl fmt::Debug for NarrowName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

/// Length in units of a NUL-terminated wide string, searching at most
/// `source.len()` units.
pub fn wide_len(source: &[u16]) -> Result<usize, NameError> {
    source
        .iter()
        .position(|&c| c == 0)
        .ok_or(NameError::Unterminated { bound: source.len() })
}

/// Decode `source` into `destination`, NUL-terminating the result.
pub fn decode<'d>(source: &[u16], destination: &'d mut [u8]) -> Result<NarrowName<'d>, NameError> {
    let len = wide_len(source)?;
    if destination.len() < len + 1 {
        return Err(NameError::DestinationTooSmall {
            needed: len + 1,
            available: destination.len(),
        });
    }

    for (dst, &unit) in destination.iter_mut().zip(&source[..len]) {
        *dst = unit as u8;
    }
    destination[len] = 0;

    Ok(NarrowName { bytes: &destination[..len] })
}

/// Encode an ASCII name into `destination` as NUL-terminated UCS-2.
///
/// Returns the units written including the terminator.
pub fn encode(name: &str, destination: &mut [u16]) -> Result<usize, NameError> {
    let needed = name.len() + 1;
    if destination.len() < needed {
        return Err(NameError::DestinationTooSmall {
            needed: needed * 2,
            available: destination.len() * 2,
        });
    }
    for (dst, b) in destination.iter_mut().zip(name.bytes()) {
        *dst = b as u16;
    }
    destination[name.len()] = 0;
    Ok(needed)
}
