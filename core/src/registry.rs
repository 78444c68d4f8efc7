//! Command table
//!
//! The host builds one registry, dispatches through it, and drops it when
//! done. There is no global registration.

use core::fmt::{self, Write};

use crate::args::SETUP_VAR_USAGE;
use crate::commands;
use crate::config::Workspace;
use crate::error::{ArgError, CommandError};
use crate::firmware::VariableServices;
use crate::log_info;

const MAX_COMMANDS: usize = 8;

/// Entry point every registered command shares.
pub type Handler = fn(
    &mut dyn VariableServices,
    &mut Workspace<'_>,
    &[&str],
    &mut dyn Write,
) -> Result<(), CommandError>;

#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    Duplicate(&'static str),
    Full,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(name) => write!(f, "Command already registered: {}", name),
            Self::Full => write!(f, "Command table full"),
        }
    }
}

pub struct CommandRegistry {
    commands: [Option<Command>; MAX_COMMANDS],
}

impl CommandRegistry {
    pub const fn empty() -> Self {
        Self {
            commands: [None; MAX_COMMANDS],
        }
    }

    /// Registry holding `setup_var` and `lsefivar`.
    pub fn new() -> Self {
        let mut commands = [None; MAX_COMMANDS];
        commands[0] = Some(SETUP_VAR);
        commands[1] = Some(LSEFIVAR);
        log_info!("registry: commands registered");
        Self { commands }
    }

    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        if self.find(command.name).is_some() {
            return Err(RegistryError::Duplicate(command.name));
        }
        let slot = self
            .commands
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(RegistryError::Full)?;
        *slot = Some(command);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        match self
            .commands
            .iter_mut()
            .find(|slot| matches!(slot, Some(c) if c.name == name))
        {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run command `name` with `args`.
    pub fn dispatch(
        &self,
        name: &str,
        services: &mut dyn VariableServices,
        workspace: &mut Workspace<'_>,
        args: &[&str],
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let command = self.find(name).ok_or(CommandError::UnknownCommand)?;
        (command.handler)(services, workspace, args, out)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CommandRegistry {
    fn drop(&mut self) {
        self.commands = [None; MAX_COMMANDS];
        log_info!("registry: commands unregistered");
    }
}

pub const SETUP_VAR: Command = Command {
    name: "setup_var",
    usage: SETUP_VAR_USAGE,
    summary: "Read/Write specific (byte) offset of setup variable.",
    handler: run_setup_var,
};

pub const LSEFIVAR: Command = Command {
    name: "lsefivar",
    usage: "lsefivar",
    summary: "Lists all efi variables.",
    handler: run_lsefivar,
};

fn run_setup_var(
    services: &mut dyn VariableServices,
    workspace: &mut Workspace<'_>,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    commands::setup_var(services, workspace, args, out).map(|_| ())
}

fn run_lsefivar(
    services: &mut dyn VariableServices,
    workspace: &mut Workspace<'_>,
    args: &[&str],
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    if !args.is_empty() {
        return Err(ArgError::Count { got: args.len(), min: 0, max: 0 }.into());
    }
    commands::lsefivar(services, workspace, out).map(|_| ())
}
