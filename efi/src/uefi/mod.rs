//! Minimal UEFI table bindings
//!
//! Only the tables and entries this application calls are typed; the rest
//! are kept as pointer-sized placeholders so the layout stays correct.
//!
//! Based on UEFI Specification 2.10 Section 4 (EFI System Table)

pub mod boot_services;
pub mod loaded_image;
pub mod runtime_services;
pub mod system_table;
pub mod text_output;

pub use setupvar_core::Status;

/// EFI Handle type
pub type Handle = *mut core::ffi::c_void;

/// Table entry this application never calls
pub type Unused = usize;

/// Common header of every EFI table
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TableHeader {
    pub signature: u64,
    pub revision: u32,
    pub header_size: u32,
    pub crc32: u32,
    pub reserved: u32,
}
