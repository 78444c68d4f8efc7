//! Single-byte patch state machine
//!
//! ```text
//! Idle ─▶ Validating ─┬─▶ Rejected                       (offset >= size)
//!                     └─▶ Reporting ─┬─▶ Done            (read only)
//!                                    └─▶ Writing ─┬─▶ Committed
//!                                                 └─▶ Failed
//! ```
//!
//! Validation runs against the size of the snapshot actually fetched, and
//! nothing is read or written before it passes. The current byte is always
//! reported before a write.

use core::fmt::Write;

use crate::accessor::{VariableAccessor, VariableSnapshot};
use crate::enumerator::VariableIdentity;
use crate::error::{AccessError, CommandError, PatchError};
use crate::firmware::VariableServices;
use crate::{log_error, log_info, log_trace, log_warn};

/// One read or read-modify-write of a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRequest<'a> {
    pub target_name: &'a str,
    pub offset: u16,
    /// `None` for a read-only request
    pub value: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    Idle,
    Validating,
    Reporting,
    Writing,
    /// Terminal: write stored
    Committed,
    /// Terminal: read-only request answered
    Done,
    /// Terminal: offset out of range
    Rejected,
    /// Terminal: store-back failed
    Failed,
}

impl PatchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Done | Self::Rejected | Self::Failed)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Reporting => "reporting",
            Self::Writing => "writing",
            Self::Committed => "committed",
            Self::Done => "done",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// How a patch ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Read { offset: u16, value: u8 },
    Written { offset: u16, previous: u8, value: u8 },
}

/// Runs one `PatchRequest` against one fetched snapshot.
pub struct OffsetPatcher<'r> {
    request: PatchRequest<'r>,
    state: PatchState,
    previous: Option<u8>,
    error: Option<PatchError>,
}

impl<'r> OffsetPatcher<'r> {
    pub fn new(request: PatchRequest<'r>) -> Self {
        Self {
            request,
            state: PatchState::Idle,
            previous: None,
            error: None,
        }
    }

    pub fn state(&self) -> PatchState {
        self.state
    }

    /// Advance one transition. Returns the new state.
    ///
    /// Terminal states are sticky: stepping them does nothing.
    pub fn step<F, W>(
        &mut self,
        services: &mut F,
        identity: &VariableIdentity<'_>,
        snapshot: &mut VariableSnapshot<'_>,
        out: &mut W,
    ) -> Result<PatchState, CommandError>
    where
        F: VariableServices + ?Sized,
        W: Write + ?Sized,
    {
        let offset = self.request.offset;

        self.state = match self.state {
            PatchState::Idle => PatchState::Validating,
            PatchState::Validating => {
                if usize::from(offset) < snapshot.declared_size() {
                    PatchState::Reporting
                } else {
                    log_warn!("patcher: offset out of range");
                    self.error = Some(PatchError::OutOfRange {
                        offset,
                        size: snapshot.declared_size(),
                    });
                    PatchState::Rejected
                }
            }
            PatchState::Reporting => {
                let current = self.byte_at(snapshot)?;
                self.previous = Some(current);
                writeln!(out, "Offset 0x{:02x} is: 0x{:02x}", offset, current)?;
                match self.request.value {
                    Some(_) => PatchState::Writing,
                    None => PatchState::Done,
                }
            }
            PatchState::Writing => {
                // Writing is only entered from Reporting with a value present
                let value = self.request.value.unwrap_or_default();
                writeln!(out, "Writing 0x{:02x} to offset 0x{:02x}", value, offset)?;
                snapshot.set_byte(usize::from(offset), value);

                match VariableAccessor::store(services, identity, snapshot) {
                    Ok(()) => {
                        log_info!("patcher: committed");
                        // Terminal before any further output; the write is done
                        self.state = PatchState::Committed;
                        let now = self.byte_at(snapshot)?;
                        writeln!(out, "Offset 0x{:02x} is now: 0x{:02x}", offset, now)?;
                        PatchState::Committed
                    }
                    Err(e) => {
                        log_error!("patcher: store failed");
                        self.error = Some(PatchError::Access(e));
                        PatchState::Failed
                    }
                }
            }
            terminal => terminal,
        };

        log_trace!(self.state.name());
        Ok(self.state)
    }

    /// Drive the machine to a terminal state.
    pub fn run<F, W>(
        mut self,
        services: &mut F,
        identity: &VariableIdentity<'_>,
        snapshot: &mut VariableSnapshot<'_>,
        out: &mut W,
    ) -> Result<PatchOutcome, CommandError>
    where
        F: VariableServices + ?Sized,
        W: Write + ?Sized,
    {
        while !self.state.is_terminal() {
            match self.step(services, identity, snapshot, out) {
                Ok(_) => {}
                // Only the report after a stored write can fail this late
                Err(CommandError::Output) if self.state == PatchState::Committed => {
                    log_warn!("patcher: post-commit report lost");
                }
                Err(e) => return Err(e),
            }
        }
        self.outcome().map_err(CommandError::from)
    }

    /// Outcome of a machine that reached a terminal state.
    pub fn outcome(&self) -> Result<PatchOutcome, PatchError> {
        let offset = self.request.offset;
        match (self.state, self.previous, self.request.value) {
            (PatchState::Done, Some(value), _) => Ok(PatchOutcome::Read { offset, value }),
            (PatchState::Committed, Some(previous), Some(value)) => {
                Ok(PatchOutcome::Written { offset, previous, value })
            }
            _ => Err(self
                .error
                .unwrap_or(PatchError::Access(AccessError::Fetch(crate::Status::ABORTED)))),
        }
    }

    fn byte_at(&self, snapshot: &VariableSnapshot<'_>) -> Result<u8, CommandError> {
        let offset = self.request.offset;
        snapshot.byte(usize::from(offset)).ok_or(CommandError::Bounds {
            offset,
            size: snapshot.declared_size(),
        })
    }
}
