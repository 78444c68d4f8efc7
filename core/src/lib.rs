//! Firmware variable store protocol.
//!
//! Enumerates the variables a firmware exposes through its runtime
//! variable services, locates one by name, and reads or rewrites a single
//! byte of its data blob.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │   commands (setup_var / lsefivar)        │
//! │   registry (host-owned command table)    │
//! └──────┬──────────────┬──────────────┬─────┘
//!        │              │              │
//!        ▼              ▼              ▼
//!   enumerator      accessor        patcher
//!   (cursor scan)   (fetch/store)   (bounds + byte)
//!        │              │
//!        ▼              ▼
//! ┌──────────────────────────────────────────┐
//! │   VariableServices (firmware capability) │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The core never owns firmware handles or scratch memory: the host passes
//! a `VariableServices` implementation and a `Workspace` of bounded
//! buffers into every operation.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod logger;

pub mod accessor;
pub mod args;
pub mod commands;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod firmware;
pub mod name;
pub mod patcher;
pub mod registry;
pub mod status;

#[cfg(test)]
pub(crate) mod mock;

pub use accessor::{VariableAccessor, VariableSnapshot};
pub use config::{StoreLimits, Workspace};
pub use enumerator::{VariableEnumerator, VariableIdentity};
pub use error::CommandError;
pub use firmware::{Attributes, VariableServices};
pub use patcher::{OffsetPatcher, PatchOutcome, PatchRequest};
pub use registry::CommandRegistry;
pub use status::Status;
pub use uguid::Guid;
