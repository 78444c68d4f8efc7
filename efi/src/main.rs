//! setup_var.efi
//!
//! Run from the UEFI shell as `setup_var.efi <store> [offset] [value]`, or
//! renamed to `lsefivar.efi`, or as `<image> <command> [args...]`.

#![cfg_attr(target_os = "uefi", no_std)]
#![cfg_attr(target_os = "uefi", no_main)]

#[cfg(target_os = "uefi")]
mod entry {
    use core::panic::PanicInfo;

    use setupvar_efi::allocator::HybridAllocator;
    use setupvar_efi::uefi::system_table::SystemTable;
    use setupvar_efi::uefi::{Handle, Status};

    #[global_allocator]
    static ALLOCATOR: HybridAllocator = HybridAllocator;

    #[no_mangle]
    pub extern "efiapi" fn efi_main(image: Handle, system_table: *mut SystemTable) -> Status {
        unsafe { setupvar_efi::app::run(image, system_table) }
    }

    #[panic_handler]
    fn panic(_info: &PanicInfo) -> ! {
        setupvar_core::log_error!("panic");
        loop {
            core::hint::spin_loop();
        }
    }
}

#[cfg(not(target_os = "uefi"))]
fn main() {
    eprintln!("setup_var runs under UEFI; build with --target x86_64-unknown-uefi");
    std::process::exit(1);
}
