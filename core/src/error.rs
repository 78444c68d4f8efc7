//! Error types, one per protocol layer, folded into `CommandError`.

use core::fmt;

use crate::status::Status;

/// Scratch buffer configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Name buffer too small or not a whole number of UCS-2 units (bytes)
    NameCapacity(usize),
    /// Data buffer empty
    DataCapacity(usize),
    /// Narrow buffer shorter than the wide buffer it decodes
    NarrowCapacity { narrow: usize, wide: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameCapacity(n) => write!(f, "Invalid name buffer size: {} bytes", n),
            Self::DataCapacity(n) => write!(f, "Invalid data buffer size: {} bytes", n),
            Self::NarrowCapacity { narrow, wide } => write!(
                f,
                "Narrow name buffer ({} bytes) shorter than wide buffer ({} units)",
                narrow, wide
            ),
        }
    }
}

/// Wide-to-narrow name decoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    /// No NUL within the first `bound` units
    Unterminated { bound: usize },
    /// Destination cannot hold the name plus its NUL
    DestinationTooSmall { needed: usize, available: usize },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unterminated { bound } => {
                write!(f, "Variable name not terminated within {} characters", bound)
            }
            Self::DestinationTooSmall { needed, available } => write!(
                f,
                "Name buffer too small ({} bytes needed, {} available)",
                needed, available
            ),
        }
    }
}

/// Enumeration faults. Exhaustion is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumError {
    /// get_next_variable_name returned something other than SUCCESS/NOT_FOUND
    Firmware(Status),
    /// SUCCESS, but the returned name has no NUL inside the buffer
    UnterminatedName,
}

impl fmt::Display for EnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Firmware(status) => write!(f, "Variable enumeration failed (status: {})", status),
            Self::UnterminatedName => write!(f, "Firmware returned an unterminated variable name"),
        }
    }
}

/// Fetch and store faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// get_variable failed
    Fetch(Status),
    /// Firmware reported an undersized buffer again after the resize
    ResizedTwice { required: usize },
    /// Firmware needs more than the caller's buffer holds
    CapacityExceeded { required: usize, capacity: usize },
    /// set_variable failed
    Store(Status),
}

impl AccessError {
    pub fn status(&self) -> Status {
        match self {
            Self::Fetch(status) | Self::Store(status) => *status,
            Self::ResizedTwice { .. } | Self::CapacityExceeded { .. } => Status::BUFFER_TOO_SMALL,
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(status) => write!(f, "Unable to open variable store! (Error: {})", status),
            Self::ResizedTwice { required } => write!(
                f,
                "Unable to open variable store! Size changed again after retry ({} bytes)",
                required
            ),
            Self::CapacityExceeded { required, capacity } => write!(
                f,
                "Variable store too large ({} bytes, buffer holds {})",
                required, capacity
            ),
            Self::Store(status) => write!(f, "Unable to write data! (Error: {})", status),
        }
    }
}

/// Offset patch faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchError {
    /// Offset at or past the fetched size; nothing was read or written
    OutOfRange { offset: u16, size: usize },
    /// Store-back failed
    Access(AccessError),
}

impl From<AccessError> for PatchError {
    fn from(e: AccessError) -> Self {
        Self::Access(e)
    }
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { offset, size } => write!(
                f,
                "Offset 0x{:02x} out of range (store size {} bytes). Did you open the right variable store?",
                offset, size
            ),
            Self::Access(e) => fmt::Display::fmt(e, f),
        }
    }
}

/// Command-line argument errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgError {
    /// Wrong number of positional arguments
    Count { got: usize, min: usize, max: usize },
    InvalidOffset,
    InvalidValue,
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count { got, min, max } => write!(
                f,
                "Expected {} to {} arguments, got {}",
                min, max, got
            ),
            Self::InvalidOffset => {
                write!(f, "Invalid offset argument. Please provide a hex value (e.g. 0x1af).")
            }
            Self::InvalidValue => {
                write!(f, "Invalid value argument. Please provide a hex value (e.g. 0x01).")
            }
        }
    }
}

/// Anything a command can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    Args(ArgError),
    Config(ConfigError),
    Name(NameError),
    Enumeration(EnumError),
    Access(AccessError),
    Bounds { offset: u16, size: usize },
    /// Operator output sink refused a write
    Output,
    UnknownCommand,
}

impl CommandError {
    /// Firmware status the host should exit with.
    pub fn status(&self) -> Status {
        match self {
            Self::Args(_) | Self::Bounds { .. } | Self::Name(_) => Status::INVALID_PARAMETER,
            Self::Config(_) => Status::OUT_OF_RESOURCES,
            Self::Enumeration(EnumError::Firmware(status)) => *status,
            Self::Enumeration(EnumError::UnterminatedName) => Status::DEVICE_ERROR,
            Self::Access(e) => e.status(),
            Self::Output => Status::DEVICE_ERROR,
            Self::UnknownCommand => Status::NOT_FOUND,
        }
    }
}

impl From<ArgError> for CommandError {
    fn from(e: ArgError) -> Self {
        Self::Args(e)
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<NameError> for CommandError {
    fn from(e: NameError) -> Self {
        Self::Name(e)
    }
}

impl From<EnumError> for CommandError {
    fn from(e: EnumError) -> Self {
        Self::Enumeration(e)
    }
}

impl From<AccessError> for CommandError {
    fn from(e: AccessError) -> Self {
        Self::Access(e)
    }
}

impl From<PatchError> for CommandError {
    fn from(e: PatchError) -> Self {
        match e {
            PatchError::OutOfRange { offset, size } => Self::Bounds { offset, size },
            PatchError::Access(e) => Self::Access(e),
        }
    }
}

impl From<fmt::Error> for CommandError {
    fn from(_: fmt::Error) -> Self {
        Self::Output
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Args(e) => fmt::Display::fmt(e, f),
            Self::Config(e) => fmt::Display::fmt(e, f),
            Self::Name(e) => fmt::Display::fmt(e, f),
            Self::Enumeration(e) => fmt::Display::fmt(e, f),
            Self::Access(e) => fmt::Display::fmt(e, f),
            Self::Bounds { offset, size } => fmt::Display::fmt(
                &PatchError::OutOfRange { offset: *offset, size: *size },
                f,
            ),
            Self::Output => write!(f, "Console write failed"),
            Self::UnknownCommand => write!(f, "Unknown command"),
        }
    }
}
