//! UEFI host for the setup_var and lsefivar commands
//!
//! Binds the firmware tables this application needs, implements
//! `VariableServices` on top of Runtime Services, and feeds the shell's
//! load options through the core command registry.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod allocator;
pub mod app;
pub mod cmdline;
pub mod console;
pub mod firmware;
pub mod uefi;
