//! Variable data fetch and store
//!
//! GetVariable reports the true size of a variable as a side effect of
//! failing with `BUFFER_TOO_SMALL`. The fetch path is an explicit
//! two-attempt machine built on that:
//!
//! ```text
//! First(guess) ──SUCCESS──────────────▶ snapshot
//!      │
//!      └─BUFFER_TOO_SMALL(n)─▶ Resized(n) ──SUCCESS──▶ snapshot
//!                                   │
//!                                   └─BUFFER_TOO_SMALL──▶ ResizedTwice
//! ```
//!
//! There is never a third call, whatever the firmware keeps reporting.

use crate::enumerator::VariableIdentity;
use crate::error::AccessError;
use crate::firmware::{Attributes, VariableServices};
use crate::status::Status;
use crate::{log_error, log_info, log_trace, log_warn};

/// One fetched copy of a variable.
#[derive(Debug, PartialEq, Eq)]
pub struct VariableSnapshot<'a> {
    /// Exactly `declared_size` bytes
    data: &'a mut [u8],
    attributes: Attributes,
    /// Whether the one-shot resize was needed
    resized: bool,
}

impl<'a> VariableSnapshot<'a> {
    pub fn declared_size(&self) -> usize {
        self.data.len()
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn resized(&self) -> bool {
        self.resized
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..]
    }

    /// Byte at `offset`, if inside the declared size
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Overwrite the byte at `offset`; returns the previous value
    pub fn set_byte(&mut self, offset: usize, value: u8) -> Option<u8> {
        let slot = self.data.get_mut(offset)?;
        let previous = *slot;
        *slot = value;
        Some(previous)
    }
}

/// Result of a size probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub size: usize,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    /// Caller's best guess
    First(usize),
    /// Size the firmware just reported
    Resized(usize),
}

/// Fetches variables into a caller-owned buffer of fixed capacity.
pub struct VariableAccessor<'b> {
    buffer: &'b mut [u8],
}

impl<'b> VariableAccessor<'b> {
    pub fn new(buffer: &'b mut [u8]) -> Self {
        Self { buffer }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Fetch `identity` using the whole buffer as the first guess.
    pub fn fetch<F: VariableServices + ?Sized>(
        &mut self,
        services: &mut F,
        identity: &VariableIdentity<'_>,
    ) -> Result<VariableSnapshot<'_>, AccessError> {
        let guess = self.buffer.len();
        self.fetch_with_guess(services, identity, guess)
    }

    /// Fetch `identity`, offering `guess` bytes on the first attempt.
    ///
    /// A guess larger than the buffer is clamped to it.
    pub fn fetch_with_guess<F: VariableServices + ?Sized>(
        &mut self,
        services: &mut F,
        identity: &VariableIdentity<'_>,
        guess: usize,
    ) -> Result<VariableSnapshot<'_>, AccessError> {
        let capacity = self.capacity();
        let mut attempt = Attempt::First(guess.min(capacity));
        let mut attributes = Attributes::DEFAULT;

        loop {
            let (offered, resized) = match attempt {
                Attempt::First(size) => (size, false),
                Attempt::Resized(size) => (size, true),
            };

            let mut size = offered;
            let status = services.get_variable(
                identity.name,
                &identity.guid,
                &mut attributes,
                &mut size,
                &mut self.buffer[..offered],
            );

            match (attempt, status) {
                (_, Status::SUCCESS) => {
                    if size > offered {
                        // Firmware claims to have written more than we offered
                        log_error!("accessor: firmware overstated fetched size");
                        return Err(AccessError::Fetch(Status::DEVICE_ERROR));
                    }
                    log_trace!("accessor: fetched");
                    return Ok(VariableSnapshot {
                        data: &mut self.buffer[..size],
                        attributes,
                        resized,
                    });
                }
                (Attempt::First(_), Status::BUFFER_TOO_SMALL) => {
                    if size > capacity {
                        log_error!("accessor: variable larger than data buffer");
                        return Err(AccessError::CapacityExceeded { required: size, capacity });
                    }
                    log_warn!("accessor: buffer too small, retrying with reported size");
                    attempt = Attempt::Resized(size);
                }
                (Attempt::Resized(_), Status::BUFFER_TOO_SMALL) => {
                    log_error!("accessor: buffer too small after resize");
                    return Err(AccessError::ResizedTwice { required: size });
                }
                (_, status) => {
                    log_error!("accessor: get_variable failed");
                    return Err(AccessError::Fetch(status));
                }
            }
        }
    }

    /// Learn a variable's size without keeping its data.
    ///
    /// Offers one real byte of the buffer, so `BUFFER_TOO_SMALL` is the
    /// expected answer for anything larger.
    pub fn probe<F: VariableServices + ?Sized>(
        &mut self,
        services: &mut F,
        identity: &VariableIdentity<'_>,
    ) -> Result<Probe, AccessError> {
        let mut attributes = Attributes::DEFAULT;
        let offered = self.capacity().min(1);
        let mut size = offered;
        let status = services.get_variable(
            identity.name,
            &identity.guid,
            &mut attributes,
            &mut size,
            &mut self.buffer[..offered],
        );

        match status {
            Status::SUCCESS | Status::BUFFER_TOO_SMALL => Ok(Probe { size, attributes }),
            status => Err(AccessError::Fetch(status)),
        }
    }

    /// Write `snapshot` back verbatim under `identity`.
    pub fn store<F: VariableServices + ?Sized>(
        services: &mut F,
        identity: &VariableIdentity<'_>,
        snapshot: &VariableSnapshot<'_>,
    ) -> Result<(), AccessError> {
        let status = services.set_variable(
            identity.name,
            &identity.guid,
            snapshot.attributes,
            snapshot.data(),
        );

        if !status.is_success() {
            log_error!("accessor: set_variable failed");
            return Err(AccessError::Store(status));
        }
        log_info!("accessor: stored");
        Ok(())
    }
}
