//! EFI Boot Services (pool allocation and protocol lookup only)

use core::ffi::c_void;

use setupvar_core::Guid;

use super::{Handle, Status, TableHeader, Unused};

/// EFI_LOADER_DATA memory type
pub const LOADER_DATA: u32 = 2;

#[repr(C)]
pub struct BootServices {
    pub hdr: TableHeader,

    // Task priority
    pub raise_tpl: Unused,
    pub restore_tpl: Unused,

    // Memory
    pub allocate_pages: Unused,
    pub free_pages: Unused,
    pub get_memory_map: Unused,
    pub allocate_pool: unsafe extern "efiapi" fn(
        pool_type: u32,
        size: usize,
        buffer: *mut *mut u8,
    ) -> Status,
    pub free_pool: unsafe extern "efiapi" fn(buffer: *mut u8) -> Status,

    // Events
    pub create_event: Unused,
    pub set_timer: Unused,
    pub wait_for_event: Unused,
    pub signal_event: Unused,
    pub close_event: Unused,
    pub check_event: Unused,

    // Protocol handlers
    pub install_protocol_interface: Unused,
    pub reinstall_protocol_interface: Unused,
    pub uninstall_protocol_interface: Unused,
    pub handle_protocol: unsafe extern "efiapi" fn(
        handle: Handle,
        protocol: *const Guid,
        interface: *mut *mut c_void,
    ) -> Status,
}
