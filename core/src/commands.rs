//! `setup_var` and `lsefivar`
//!
//! Both commands take the firmware capability, the scratch workspace and
//! an output sink from the caller; nothing here is global.

use core::fmt::Write;

use crate::accessor::VariableAccessor;
use crate::args::{SetupVarArgs, SETUP_VAR_USAGE};
use crate::config::Workspace;
use crate::enumerator::VariableEnumerator;
use crate::error::{ArgError, CommandError};
use crate::firmware::VariableServices;
use crate::name;
use crate::patcher::{OffsetPatcher, PatchOutcome};
use crate::{log_info, log_warn};

/// How a `setup_var` run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupVarOutcome {
    /// Scan finished without a matching name
    NotFound,
    /// Store located, metadata printed, nothing fetched
    Located,
    Patched(PatchOutcome),
}

/// Listing totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListSummary {
    pub listed: usize,
    /// Entries whose size probe failed
    pub skipped: usize,
}

/// `setup_var storename [offset] [setval]`
pub fn setup_var<F, W>(
    services: &mut F,
    workspace: &mut Workspace<'_>,
    args: &[&str],
    out: &mut W,
) -> Result<SetupVarOutcome, CommandError>
where
    F: VariableServices + ?Sized,
    W: Write + ?Sized,
{
    if args.is_empty() {
        writeln!(out, "Usage: {}", SETUP_VAR_USAGE)?;
        return Err(ArgError::Count { got: 0, min: 1, max: 3 }.into());
    }
    let request = SetupVarArgs::parse(args)?;
    let target = request.target_name();

    writeln!(out, "Searching for variable store \"{}\"...", target)?;

    let mut scan = VariableEnumerator::new(&mut *workspace.name);
    loop {
        let identity = match scan.next(services)? {
            Some(identity) => identity,
            None => {
                writeln!(out, "Unable to find variable store.")?;
                log_warn!("setup_var: store not found");
                return Ok(SetupVarOutcome::NotFound);
            }
        };

        let decoded = name::decode(identity.name, &mut *workspace.narrow)?;
        if !decoded.matches(target) {
            continue;
        }

        log_info!("setup_var: store found");
        writeln!(
            out,
            "store name: {}, name size: {}, store guid: {}",
            decoded, identity.name_size, identity.guid
        )?;

        let patch = match request {
            SetupVarArgs::Locate { .. } => return Ok(SetupVarOutcome::Located),
            SetupVarArgs::Patch(patch) => patch,
        };

        let mut accessor = VariableAccessor::new(&mut *workspace.data);
        let mut snapshot = accessor.fetch(services, &identity)?;
        let size = snapshot.declared_size();
        if snapshot.resized() {
            writeln!(
                out,
                "Expected a different size of the variable store (got {} (0x{:x}) bytes). Continue with care...",
                size, size
            )?;
        }
        writeln!(
            out,
            "Successfully opened \"{}\" from VSS (got {} (0x{:x}) bytes).",
            target, size, size
        )?;

        let outcome = OffsetPatcher::new(patch).run(services, &identity, &mut snapshot, out)?;
        return Ok(SetupVarOutcome::Patched(outcome));
    }
}

/// `lsefivar`: one line per enumerable variable.
pub fn lsefivar<F, W>(
    services: &mut F,
    workspace: &mut Workspace<'_>,
    out: &mut W,
) -> Result<ListSummary, CommandError>
where
    F: VariableServices + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "Listing EFI variables...")?;

    let mut summary = ListSummary::default();
    let mut scan = VariableEnumerator::new(&mut *workspace.name);
    while let Some(identity) = scan.next(services)? {
        let decoded = name::decode(identity.name, &mut *workspace.narrow)?;

        match VariableAccessor::new(&mut *workspace.data).probe(services, &identity) {
            Ok(probe) => {
                writeln!(
                    out,
                    "name size: {:02}, var size: {:06} (0x{:06x}), var guid: {}, name: {}",
                    identity.name_size, probe.size, probe.size, identity.guid, decoded
                )?;
                summary.listed += 1;
            }
            Err(e) => {
                log_warn!("lsefivar: size probe failed, skipping");
                writeln!(
                    out,
                    "get_variable exited with code {}, name: {}",
                    e.status(),
                    decoded
                )?;
                summary.skipped += 1;
            }
        }
    }

    log_info!("lsefivar: listing complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AccessError, EnumError};
    use crate::mock::{guid_a, guid_b, MockFirmware};
    use crate::status::Status;
    use std::string::String;
    use std::vec;

    struct Buffers {
        name: std::vec::Vec<u16>,
        narrow: std::vec::Vec<u8>,
        data: std::vec::Vec<u8>,
    }

    impl Buffers {
        fn new(data: usize) -> Self {
            Self {
                name: vec![0; 512],
                narrow: vec![0; 512],
                data: vec![0; data],
            }
        }

        fn workspace(&mut self) -> Workspace<'_> {
            Workspace::new(&mut self.name, &mut self.narrow, &mut self.data).unwrap()
        }
    }

    fn store() -> MockFirmware {
        let mut fw = MockFirmware::new();
        fw.add("Boot0000", guid_b(), 0x7, &[1, 2, 3]);
        fw.add("IH2O", guid_a(), 0x7, &[0u8; 64]);
        fw.add("Lang", guid_b(), 0x6, b"eng");
        fw
    }

    fn run_setup_var(fw: &mut MockFirmware, args: &[&str]) -> (Result<SetupVarOutcome, CommandError>, String) {
        let mut bufs = Buffers::new(65536);
        let mut ws = bufs.workspace();
        let mut out = String::new();
        let result = setup_var(fw, &mut ws, args, &mut out);
        (result, out)
    }

    #[test]
    fn test_ih2o_write_scenario() {
        let mut fw = store();

        let (result, out) = run_setup_var(&mut fw, &["IH2O", "10", "2a"]);
        assert_eq!(
            result,
            Ok(SetupVarOutcome::Patched(PatchOutcome::Written {
                offset: 0x10,
                previous: 0x00,
                value: 0x2a,
            }))
        );
        assert!(out.contains("Searching for variable store \"IH2O\"..."));
        assert!(out.contains("Successfully opened \"IH2O\" from VSS (got 64 (0x40) bytes)."));
        assert!(out.contains("Offset 0x10 is: 0x00\n"));
        assert!(out.contains("Writing 0x2a to offset 0x10\n"));
        assert_eq!(fw.calls.set, 1);

        let (result, out) = run_setup_var(&mut fw, &["IH2O", "10"]);
        assert_eq!(
            result,
            Ok(SetupVarOutcome::Patched(PatchOutcome::Read { offset: 0x10, value: 0x2a }))
        );
        assert!(out.contains("Offset 0x10 is: 0x2a\n"));
        assert_eq!(fw.calls.set, 1);
    }

    #[test]
    fn test_ih2o_out_of_range_scenario() {
        let mut fw = store();
        let (result, out) = run_setup_var(&mut fw, &["IH2O", "50", "1"]);
        assert_eq!(result, Err(CommandError::Bounds { offset: 0x50, size: 64 }));
        assert_eq!(result.unwrap_err().status(), Status::INVALID_PARAMETER);
        assert!(!out.contains("Offset 0x50 is"));
        assert_eq!(fw.calls.set, 0);
    }

    #[test]
    fn test_locate_only_fetches_nothing() {
        let mut fw = store();
        let (result, out) = run_setup_var(&mut fw, &["IH2O"]);
        assert_eq!(result, Ok(SetupVarOutcome::Located));
        assert!(out.contains("store name: IH2O, name size: 10, store guid: "));
        assert_eq!(fw.calls.get, 0);
    }

    #[test]
    fn test_not_found_is_not_an_error() {
        let mut fw = store();
        let (result, out) = run_setup_var(&mut fw, &["Setup", "0"]);
        assert_eq!(result, Ok(SetupVarOutcome::NotFound));
        assert!(out.ends_with("Unable to find variable store.\n"));
        assert_eq!(fw.calls.next_name, 4);
    }

    #[test]
    fn test_bad_arguments_touch_no_firmware() {
        let mut fw = store();
        let (result, out) = run_setup_var(&mut fw, &[]);
        assert_eq!(result, Err(CommandError::Args(ArgError::Count { got: 0, min: 1, max: 3 })));
        assert!(out.starts_with("Usage: "));

        let (result, _) = run_setup_var(&mut fw, &["IH2O", "xyz"]);
        assert_eq!(result, Err(CommandError::Args(ArgError::InvalidOffset)));

        let (result, _) = run_setup_var(&mut fw, &["IH2O", "10", "1ff"]);
        assert_eq!(result, Err(CommandError::Args(ArgError::InvalidValue)));

        assert_eq!(fw.calls.next_name, 0);
        assert_eq!(fw.calls.get, 0);
    }

    #[test]
    fn test_first_match_wins() {
        let mut fw = MockFirmware::new();
        fw.add("IH2O", guid_a(), 0x7, &[0xa1; 4]);
        fw.add("IH2O", guid_b(), 0x7, &[0xb2; 4]);

        let (result, _) = run_setup_var(&mut fw, &["IH2O", "0"]);
        assert_eq!(
            result,
            Ok(SetupVarOutcome::Patched(PatchOutcome::Read { offset: 0, value: 0xa1 }))
        );
    }

    #[test]
    fn test_enumeration_fault_aborts() {
        let mut fw = store();
        fw.fail_next_name_at = Some((2, Status::DEVICE_ERROR));
        let (result, _) = run_setup_var(&mut fw, &["IH2O", "0"]);
        assert_eq!(
            result,
            Err(CommandError::Enumeration(EnumError::Firmware(Status::DEVICE_ERROR)))
        );
        assert_eq!(fw.calls.get, 0);
    }

    #[test]
    fn test_resize_is_reported() {
        let mut fw = store();
        fw.undersize_first_fetches = 1;
        let (result, out) = run_setup_var(&mut fw, &["IH2O", "3"]);
        assert!(result.is_ok());
        assert!(out.contains("Expected a different size of the variable store (got 64 (0x40) bytes)"));
        assert_eq!(fw.calls.get, 2);
    }

    #[test]
    fn test_store_too_large_for_buffer() {
        let mut fw = store();
        let mut bufs = Buffers::new(32);
        let mut ws = bufs.workspace();
        let mut out = String::new();
        let result = setup_var(&mut fw, &mut ws, &["IH2O", "0"], &mut out);
        assert_eq!(
            result,
            Err(CommandError::Access(AccessError::CapacityExceeded { required: 64, capacity: 32 }))
        );
    }

    #[test]
    fn test_listing() {
        let mut fw = store();
        let mut bufs = Buffers::new(16);
        let mut ws = bufs.workspace();
        let mut out = String::new();

        let summary = lsefivar(&mut fw, &mut ws, &mut out).unwrap();
        assert_eq!(summary, ListSummary { listed: 3, skipped: 0 });

        let lines: std::vec::Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Listing EFI variables...");
        assert!(lines[1].starts_with("name size: 18, var size: 000003 (0x000003), var guid: "));
        assert!(lines[1].ends_with(", name: Boot0000"));
        assert!(lines[2].contains("var size: 000064 (0x000040)"));
        assert!(lines[3].ends_with("name: Lang"));
        assert_eq!(fw.calls.set, 0);
    }

    #[test]
    fn test_listing_is_repeatable() {
        let mut fw = store();
        let mut bufs = Buffers::new(16);

        let mut first = String::new();
        lsefivar(&mut fw, &mut bufs.workspace(), &mut first).unwrap();
        let mut second = String::new();
        lsefivar(&mut fw, &mut bufs.workspace(), &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_listing_skips_unreadable_variable() {
        let mut fw = store();
        fw.fail_get_for = Some(("Lang", Status::SECURITY_VIOLATION));
        let mut bufs = Buffers::new(16);
        let mut out = String::new();

        let summary = lsefivar(&mut fw, &mut bufs.workspace(), &mut out).unwrap();
        assert_eq!(summary, ListSummary { listed: 2, skipped: 1 });
        assert!(out.contains("get_variable exited with code"));
    }

    #[test]
    fn test_listing_stops_on_enumeration_fault() {
        let mut fw = store();
        fw.fail_next_name_at = Some((2, Status::DEVICE_ERROR));
        let mut bufs = Buffers::new(16);
        let mut out = String::new();

        let result = lsefivar(&mut fw, &mut bufs.workspace(), &mut out);
        assert_eq!(
            result,
            Err(CommandError::Enumeration(EnumError::Firmware(Status::DEVICE_ERROR)))
        );
        assert_eq!(out.lines().count(), 2);
    }
}
