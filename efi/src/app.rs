//! Application body: load options in, exit status out

use alloc::vec;
use core::ffi::c_void;
use core::fmt::Write;
use core::ptr;
use core::slice;

use setupvar_core::logger;
use setupvar_core::{log_error, log_info};
use setupvar_core::{CommandError, CommandRegistry, Status, StoreLimits, VariableServices, Workspace};

use crate::allocator;
use crate::cmdline::CommandLine;
use crate::console::Console;
use crate::firmware::RuntimeVariables;
use crate::uefi::loaded_image::{LoadedImageProtocol, LOADED_IMAGE_PROTOCOL_GUID};
use crate::uefi::system_table::{SystemTable, SYSTEM_TABLE_SIGNATURE};
use crate::uefi::Handle;

/// Log entries shown after a failed command
const LOG_TAIL: usize = 8;

/// Entry body behind `efi_main`.
///
/// # Safety
/// `system_table` must be the table the firmware passed to the image, and
/// `image` the image's own handle.
pub unsafe fn run(image: Handle, system_table: *mut SystemTable) -> Status {
    if system_table.is_null() {
        return Status::INVALID_PARAMETER;
    }
    let st = &*system_table;
    if st.hdr.signature != SYSTEM_TABLE_SIGNATURE {
        log_error!("app: bad system table signature");
        return Status::INVALID_PARAMETER;
    }

    allocator::set_boot_services(st.boot_services);
    let mut console = Console::new(st.con_out);

    let options = match load_options(st, image) {
        Ok(options) => options,
        Err(status) => {
            let _ = writeln!(console, "error: cannot open loaded image: {}", status);
            allocator::release_boot_services();
            return status;
        }
    };

    let mut services = RuntimeVariables::new(st.runtime_services);
    let status = execute(options, &mut services, StoreLimits::DEFAULT, &mut console);

    allocator::release_boot_services();
    status
}

/// The image's load options as UCS-2 units.
unsafe fn load_options(st: &SystemTable, image: Handle) -> Result<&'static [u16], Status> {
    if st.boot_services.is_null() {
        return Err(Status::UNSUPPORTED);
    }
    let bs = &*st.boot_services;

    let mut interface: *mut c_void = ptr::null_mut();
    let status = (bs.handle_protocol)(image, &LOADED_IMAGE_PROTOCOL_GUID, &mut interface);
    if status.is_error() || interface.is_null() {
        return Err(if status.is_error() { status } else { Status::NOT_FOUND });
    }

    let loaded = &*(interface as *const LoadedImageProtocol);
    if loaded.load_options.is_null() || loaded.load_options_size < 2 {
        return Ok(&[]);
    }
    let units = loaded.load_options_size as usize / 2;
    Ok(slice::from_raw_parts(loaded.load_options as *const u16, units))
}

/// Tokenize `options`, pick a command, and run it against `services`.
pub fn execute<S, W>(options: &[u16], services: &mut S, limits: StoreLimits, out: &mut W) -> Status
where
    S: VariableServices,
    W: Write,
{
    let mut scratch = vec![0u8; options.len() + 1];
    let line = match CommandLine::parse(options, &mut scratch) {
        Ok(line) => line,
        Err(e) => {
            let _ = writeln!(out, "error: {}", e);
            return Status::INVALID_PARAMETER;
        }
    };

    let registry = CommandRegistry::new();
    let (command, args) = match line.select(|name| registry.find(name).is_some()) {
        Some(selected) => selected,
        None => {
            let _ = writeln!(out, "Commands:");
            for command in registry.iter() {
                let _ = writeln!(out, "  {:<40} {}", command.usage, command.summary);
            }
            return Status::INVALID_PARAMETER;
        }
    };

    if let Err(e) = limits.validate() {
        let _ = writeln!(out, "error: {}", e);
        return CommandError::from(e).status();
    }
    let mut name = vec![0u16; limits.name_units()];
    let mut narrow = vec![0u8; limits.name_units()];
    let mut data = vec![0u8; limits.data_bytes];
    let mut workspace = match Workspace::new(&mut name, &mut narrow, &mut data) {
        Ok(workspace) => workspace,
        Err(e) => {
            let _ = writeln!(out, "error: {}", e);
            return CommandError::from(e).status();
        }
    };

    log_info!("app: dispatching");
    match registry.dispatch(command, services, &mut workspace, args, out) {
        Ok(()) => Status::SUCCESS,
        Err(e) => {
            log_error!("app: command failed");
            let _ = writeln!(out, "error: {}", e);
            for entry in logger::last(LOG_TAIL) {
                let _ = writeln!(out, "  [{}] {}", entry.level.tag(), entry.message);
            }
            e.status()
        }
    }
}
