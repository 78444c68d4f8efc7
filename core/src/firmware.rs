//! Firmware variable services capability
//!
//! The three runtime-service calls this tool consumes, expressed over
//! bounded slices instead of raw pointers. The host implements this over
//! the real `EFI_RUNTIME_SERVICES` table; tests implement it in memory.

use crate::status::Status;
use uguid::Guid;

/// Variable attribute bitmask.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attributes(pub u32);

impl Attributes {
    pub const NON_VOLATILE: u32 = 0x0000_0001;
    pub const BOOTSERVICE_ACCESS: u32 = 0x0000_0002;
    pub const RUNTIME_ACCESS: u32 = 0x0000_0004;
    pub const HARDWARE_ERROR_RECORD: u32 = 0x0000_0008;
    pub const AUTHENTICATED_WRITE_ACCESS: u32 = 0x0000_0010;
    pub const TIME_BASED_AUTHENTICATED_WRITE_ACCESS: u32 = 0x0000_0020;
    pub const APPEND_WRITE: u32 = 0x0000_0040;

    /// NV + BS + RT, what a platform Setup variable normally carries.
    pub const DEFAULT: Self = Self(Self::NON_VOLATILE | Self::BOOTSERVICE_ACCESS | Self::RUNTIME_ACCESS);

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runtime variable services.
///
/// Sizes are in bytes and follow the firmware in/out convention: on entry
/// `*size` is the capacity offered, on return it is the size produced or,
/// with `BUFFER_TOO_SMALL`, the size required. Implementations must never
/// touch more of a slice than both `*size` and the slice length allow.
pub trait VariableServices {
    /// Advance the enumeration cursor held in `name`/`guid`.
    ///
    /// An empty name (`name[0] == 0`) starts a new scan.
    fn get_next_variable_name(
        &mut self,
        name_size: &mut usize,
        name: &mut [u16],
        guid: &mut Guid,
    ) -> Status;

    /// Read a variable's data. `name` must be NUL-terminated.
    fn get_variable(
        &mut self,
        name: &[u16],
        guid: &Guid,
        attributes: &mut Attributes,
        data_size: &mut usize,
        data: &mut [u8],
    ) -> Status;

    /// Write a variable's data verbatim. `name` must be NUL-terminated.
    fn set_variable(
        &mut self,
        name: &[u16],
        guid: &Guid,
        attributes: Attributes,
        data: &[u8],
    ) -> Status;
}

impl<T: VariableServices + ?Sized> VariableServices for &mut T {
    fn get_next_variable_name(
        &mut self,
        name_size: &mut usize,
        name: &mut [u16],
        guid: &mut Guid,
    ) -> Status {
        (**self).get_next_variable_name(name_size, name, guid)
    }

    fn get_variable(
        &mut self,
        name: &[u16],
        guid: &Guid,
        attributes: &mut Attributes,
        data_size: &mut usize,
        data: &mut [u8],
    ) -> Status {
        (**self).get_variable(name, guid, attributes, data_size, data)
    }

    fn set_variable(
        &mut self,
        name: &[u16],
        guid: &Guid,
        attributes: Attributes,
        data: &[u8],
    ) -> Status {
        (**self).set_variable(name, guid, attributes, data)
    }
}
