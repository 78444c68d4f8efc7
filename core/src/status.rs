//! Firmware status word
//!
//! Based on UEFI Specification 2.10 Appendix D (Status Codes)

use core::fmt;

/// High bit of the native word marks an error status.
const ERROR_BIT: usize = 1 << (usize::BITS - 1);

/// EFI status as returned by runtime services.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub usize);

impl Status {
    pub const SUCCESS: Self = Self(0);
    pub const LOAD_ERROR: Self = Self::error(1);
    pub const INVALID_PARAMETER: Self = Self::error(2);
    pub const UNSUPPORTED: Self = Self::error(3);
    pub const BUFFER_TOO_SMALL: Self = Self::error(5);
    pub const DEVICE_ERROR: Self = Self::error(7);
    pub const WRITE_PROTECTED: Self = Self::error(8);
    pub const OUT_OF_RESOURCES: Self = Self::error(9);
    pub const NOT_FOUND: Self = Self::error(14);
    pub const ABORTED: Self = Self::error(21);
    pub const SECURITY_VIOLATION: Self = Self::error(26);

    const fn error(code: usize) -> Self {
        Self(ERROR_BIT | code)
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn is_error(self) -> bool {
        self.0 & ERROR_BIT != 0
    }

    /// Status code with the error bit masked off.
    pub fn code(self) -> usize {
        self.0 & !ERROR_BIT
    }

    /// Short name for the codes this tool meets in practice.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::SUCCESS => "SUCCESS",
            Self::LOAD_ERROR => "LOAD_ERROR",
            Self::INVALID_PARAMETER => "INVALID_PARAMETER",
            Self::UNSUPPORTED => "UNSUPPORTED",
            Self::BUFFER_TOO_SMALL => "BUFFER_TOO_SMALL",
            Self::DEVICE_ERROR => "DEVICE_ERROR",
            Self::WRITE_PROTECTED => "WRITE_PROTECTED",
            Self::OUT_OF_RESOURCES => "OUT_OF_RESOURCES",
            Self::NOT_FOUND => "NOT_FOUND",
            Self::ABORTED => "ABORTED",
            Self::SECURITY_VIOLATION => "SECURITY_VIOLATION",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "0x{:016x} ({})", self.0, name),
            None => write!(f, "0x{:016x}", self.0),
        }
    }
}
