//! Variable enumeration
//!
//! Walks the firmware's variable namespace with GetNextVariableName. The
//! cursor is the name/GUID pair left in the caller's buffers by the
//! previous call; the firmware reads it back to find its place, so it is
//! never touched between steps.
//!
//! A scan is forward-only. Once the firmware answers `NOT_FOUND`, or any
//! step fails, the enumerator stops issuing calls; start a new enumerator
//! to scan again.

use uguid::Guid;

use crate::error::EnumError;
use crate::firmware::VariableServices;
use crate::name;
use crate::status::Status;
use crate::{log_error, log_info, log_trace};

/// One (name, GUID) pair produced by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableIdentity<'a> {
    /// Name including its NUL terminator
    pub name: &'a [u16],
    pub guid: Guid,
    /// Name size in bytes as reported by the firmware
    pub name_size: usize,
}

impl<'a> VariableIdentity<'a> {
    /// Name without the terminator
    pub fn name_units(&self) -> &'a [u16] {
        &self.name[..self.name.len() - 1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Fresh,
    Active,
    Exhausted,
    Faulted,
}

/// Cursor over the firmware variable namespace.
pub struct VariableEnumerator<'b> {
    name: &'b mut [u16],
    guid: Guid,
    name_size: usize,
    state: ScanState,
    steps: usize,
}

impl<'b> VariableEnumerator<'b> {
    /// Start a scan using `name` as the cursor buffer.
    pub fn new(name: &'b mut [u16]) -> Self {
        Self {
            name,
            guid: Guid::ZERO,
            name_size: 0,
            state: ScanState::Fresh,
            steps: 0,
        }
    }

    /// Advance one step.
    ///
    /// `Ok(None)` means the namespace is exhausted (or the scan already
    /// ended); the firmware is not called again.
    pub fn next<F: VariableServices + ?Sized>(
        &mut self,
        services: &mut F,
    ) -> Result<Option<VariableIdentity<'_>>, EnumError> {
        match self.state {
            ScanState::Exhausted | ScanState::Faulted => return Ok(None),
            ScanState::Fresh => {
                if let Some(first) = self.name.first_mut() {
                    *first = 0; // Empty name starts the scan
                }
                self.guid = Guid::ZERO;
                self.state = ScanState::Active;
                log_trace!("enumerator: scan started");
            }
            ScanState::Active => {}
        }

        // Offer the whole buffer every step
        self.name_size = self.name.len() * 2;
        let status = services.get_next_variable_name(&mut self.name_size, self.name, &mut self.guid);
        self.steps += 1;

        if status == Status::NOT_FOUND {
            self.state = ScanState::Exhausted;
            log_info!("enumerator: scan complete");
            return Ok(None);
        }
        if !status.is_success() {
            self.state = ScanState::Faulted;
            log_error!("enumerator: get_next_variable_name failed");
            return Err(EnumError::Firmware(status));
        }

        let len = match name::wide_len(self.name) {
            Ok(len) => len,
            Err(_) => {
                self.state = ScanState::Faulted;
                log_error!("enumerator: unterminated name");
                return Err(EnumError::UnterminatedName);
            }
        };

        Ok(Some(VariableIdentity {
            name: &self.name[..len + 1],
            guid: self.guid,
            name_size: self.name_size,
        }))
    }

    /// Number of firmware calls issued so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, ScanState::Exhausted | ScanState::Faulted)
    }
}
