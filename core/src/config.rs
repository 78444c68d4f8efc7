//! Buffer capacities and the caller-supplied scratch workspace

use crate::error::ConfigError;

/// Capacities for the scratch buffers one invocation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    /// Wide name buffer size in bytes (UCS-2, so always even).
    pub name_bytes: usize,
    /// Variable data buffer size in bytes.
    pub data_bytes: usize,
}

impl StoreLimits {
    /// 1 KiB of name, 64 KiB of data. Enough for every vendor Setup store seen so far.
    pub const DEFAULT: Self = Self {
        name_bytes: 1024,
        data_bytes: 65536,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name_bytes < 4 || self.name_bytes % 2 != 0 {
            return Err(ConfigError::NameCapacity(self.name_bytes));
        }
        if self.data_bytes == 0 {
            return Err(ConfigError::DataCapacity(self.data_bytes));
        }
        Ok(())
    }

    /// Wide name capacity in UCS-2 units.
    pub fn name_units(&self) -> usize {
        self.name_bytes / 2
    }
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scratch buffers lent to one command invocation.
///
/// The narrow buffer must hold at least one byte per wide unit so every
/// name the enumerator accepts can be decoded.
pub struct Workspace<'a> {
    pub(crate) name: &'a mut [u16],
    pub(crate) narrow: &'a mut [u8],
    pub(crate) data: &'a mut [u8],
}

impl<'a> Workspace<'a> {
    pub fn new(
        name: &'a mut [u16],
        narrow: &'a mut [u8],
        data: &'a mut [u8],
    ) -> Result<Self, ConfigError> {
        if name.len() < 2 {
            return Err(ConfigError::NameCapacity(name.len() * 2));
        }
        if narrow.len() < name.len() {
            return Err(ConfigError::NarrowCapacity {
                narrow: narrow.len(),
                wide: name.len(),
            });
        }
        if data.is_empty() {
            return Err(ConfigError::DataCapacity(0));
        }
        Ok(Self { name, narrow, data })
    }

    /// Limits this workspace can honour.
    pub fn limits(&self) -> StoreLimits {
        StoreLimits {
            name_bytes: self.name.len() * 2,
            data_bytes: self.data.len(),
        }
    }
}
