//! EFI Simple Text Output Protocol

use super::{Status, Unused};

#[repr(C)]
pub struct SimpleTextOutputProtocol {
    pub reset: Unused,
    pub output_string: unsafe extern "efiapi" fn(
        this: *mut SimpleTextOutputProtocol,
        string: *const u16,
    ) -> Status,
    pub test_string: Unused,
    pub query_mode: Unused,
    pub set_mode: Unused,
    pub set_attribute: Unused,
    pub clear_screen: Unused,
    pub set_cursor_position: Unused,
    pub enable_cursor: Unused,
    pub mode: *mut core::ffi::c_void,
}
