//! EFI Runtime Services (variable services only)
//!
//! Based on UEFI Specification 2.10 Section 8.2 (Variable Services)

use core::ffi::c_void;

use setupvar_core::Guid;

use super::{Status, TableHeader, Unused};

#[repr(C)]
pub struct RuntimeServices {
    pub hdr: TableHeader,

    // Time
    pub get_time: Unused,
    pub set_time: Unused,
    pub get_wakeup_time: Unused,
    pub set_wakeup_time: Unused,

    // Virtual memory
    pub set_virtual_address_map: Unused,
    pub convert_pointer: Unused,

    // Variables
    pub get_variable: unsafe extern "efiapi" fn(
        variable_name: *const u16,
        vendor_guid: *const Guid,
        attributes: *mut u32,
        data_size: *mut usize,
        data: *mut c_void,
    ) -> Status,
    pub get_next_variable_name: unsafe extern "efiapi" fn(
        variable_name_size: *mut usize,
        variable_name: *mut u16,
        vendor_guid: *mut Guid,
    ) -> Status,
    pub set_variable: unsafe extern "efiapi" fn(
        variable_name: *const u16,
        vendor_guid: *const Guid,
        attributes: u32,
        data_size: usize,
        data: *const c_void,
    ) -> Status,

    // Miscellaneous
    pub get_next_high_monotonic_count: Unused,
    pub reset_system: Unused,
    pub update_capsule: Unused,
    pub query_capsule_capabilities: Unused,
    pub query_variable_info: Unused,
}
