//! `VariableServices` over the firmware's Runtime Services table

use core::ffi::c_void;
use core::ptr;

use setupvar_core::{Attributes, Guid, Status, VariableServices};

use crate::uefi::runtime_services::RuntimeServices;

/// EFI_GUID is 64-bit aligned; `Guid` alone is byte-aligned.
#[repr(C, align(8))]
#[derive(Clone, Copy)]
struct AlignedGuid(Guid);

/// Variable services backed by the live Runtime Services table.
pub struct RuntimeVariables {
    rt: *const RuntimeServices,
}

impl RuntimeVariables {
    /// # Safety
    /// `rt` must point to the firmware's Runtime Services table and stay
    /// valid for the lifetime of the returned value.
    pub unsafe fn new(rt: *const RuntimeServices) -> Self {
        Self { rt }
    }
}

impl VariableServices for RuntimeVariables {
    fn get_next_variable_name(
        &mut self,
        name_size: &mut usize,
        name: &mut [u16],
        guid: &mut Guid,
    ) -> Status {
        // Never let the firmware believe it owns more than the slice
        let mut size = (*name_size).min(name.len() * 2);
        let mut vendor = AlignedGuid(*guid);

        let status = unsafe {
            ((*self.rt).get_next_variable_name)(&mut size, name.as_mut_ptr(), &mut vendor.0)
        };

        *name_size = size;
        *guid = vendor.0;
        status
    }

    fn get_variable(
        &mut self,
        name: &[u16],
        guid: &Guid,
        attributes: &mut Attributes,
        data_size: &mut usize,
        data: &mut [u8],
    ) -> Status {
        let vendor = AlignedGuid(*guid);
        let mut attr = attributes.bits();
        let mut size = (*data_size).min(data.len());
        let buffer = if data.is_empty() {
            ptr::null_mut()
        } else {
            data.as_mut_ptr() as *mut c_void
        };

        let status = unsafe {
            ((*self.rt).get_variable)(name.as_ptr(), &vendor.0, &mut attr, &mut size, buffer)
        };

        *attributes = Attributes(attr);
        *data_size = size;
        status
    }

    fn set_variable(
        &mut self,
        name: &[u16],
        guid: &Guid,
        attributes: Attributes,
        data: &[u8],
    ) -> Status {
        let vendor = AlignedGuid(*guid);
        unsafe {
            ((*self.rt).set_variable)(
                name.as_ptr(),
                &vendor.0,
                attributes.bits(),
                data.len(),
                data.as_ptr() as *const c_void,
            )
        }
    }
}
