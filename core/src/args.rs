//! `setup_var` argument parsing
//!
//! Tokenization belongs to the host; this only validates the tokens it is
//! handed. All parsing happens before the firmware is touched.

use crate::error::ArgError;
use crate::patcher::PatchRequest;

pub const SETUP_VAR_USAGE: &str = "setup_var storename [offset] [setval]";

/// What a `setup_var` invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupVarArgs<'a> {
    /// Only locate the store and print its metadata
    Locate { name: &'a str },
    /// Locate, fetch, and read (or patch) one byte
    Patch(PatchRequest<'a>),
}

impl<'a> SetupVarArgs<'a> {
    pub fn parse(args: &[&'a str]) -> Result<Self, ArgError> {
        match *args {
            [name] => Ok(Self::Locate { name }),
            [name, offset] => Ok(Self::Patch(PatchRequest {
                target_name: name,
                offset: parse_offset(offset)?,
                value: None,
            })),
            [name, offset, value] => Ok(Self::Patch(PatchRequest {
                target_name: name,
                offset: parse_offset(offset)?,
                value: Some(parse_value(value)?),
            })),
            _ => Err(ArgError::Count { got: args.len(), min: 1, max: 3 }),
        }
    }

    pub fn target_name(&self) -> &'a str {
        match self {
            Self::Locate { name } => name,
            Self::Patch(request) => request.target_name,
        }
    }
}

/// Strip an optional `0x`/`0X` prefix.
fn strip_hex_prefix(token: &str) -> &str {
    token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token)
}

pub fn parse_offset(token: &str) -> Result<u16, ArgError> {
    let digits = strip_hex_prefix(token);
    if digits.is_empty() {
        return Err(ArgError::InvalidOffset);
    }
    u16::from_str_radix(digits, 16).map_err(|_| ArgError::InvalidOffset)
}

pub fn parse_value(token: &str) -> Result<u8, ArgError> {
    let digits = strip_hex_prefix(token);
    if digits.is_empty() {
        return Err(ArgError::InvalidValue);
    }
    u8::from_str_radix(digits, 16).map_err(|_| ArgError::InvalidValue)
}
