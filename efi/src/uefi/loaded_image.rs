//! EFI Loaded Image Protocol

use core::ffi::c_void;

use setupvar_core::Guid;

use super::Handle;

/// EFI Loaded Image Protocol GUID
pub const LOADED_IMAGE_PROTOCOL_GUID: Guid = uguid::guid!("5b1b31a1-9562-11d2-8e3f-00a0c969723b");

#[repr(C)]
pub struct LoadedImageProtocol {
    pub revision: u32,
    pub parent_handle: Handle,
    pub system_table: *mut c_void,
    pub device_handle: Handle,
    pub file_path: *mut c_void,
    pub reserved: *mut c_void,
    /// Size of `load_options` in bytes
    pub load_options_size: u32,
    /// Command line as UCS-2 when started from the shell
    pub load_options: *mut c_void,
    pub image_base: *mut c_void,
    pub image_size: u64,
    pub image_code_type: u32,
    pub image_data_type: u32,
    pub unload: *mut c_void,
}
