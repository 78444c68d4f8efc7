//! In-memory variable store for tests
//!
//! Behaves like a well-mannered firmware by default, with knobs to make
//! it misbehave in the ways the protocol has to survive.

use std::string::String;
use std::vec::Vec;

use uguid::{guid, Guid};

use crate::firmware::{Attributes, VariableServices};
use crate::name;
use crate::status::Status;

pub fn guid_a() -> Guid {
    guid!("a04a27f4-df00-4d42-b552-39511302113d")
}

pub fn guid_b() -> Guid {
    guid!("8be4df61-93ca-11d2-aa0d-00e098032b8c")
}

/// NUL-terminated UCS-2 copy of `s`
pub fn wide(s: &str) -> Vec<u16> {
    let mut v: Vec<u16> = s.encode_utf16().collect();
    v.push(0);
    v
}

struct MockVariable {
    name: Vec<u16>, // With terminator
    guid: Guid,
    attributes: u32,
    data: Vec<u8>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub next_name: usize,
    pub get: usize,
    pub set: usize,
}

#[derive(Default)]
pub struct MockFirmware {
    vars: Vec<MockVariable>,
    pub calls: CallCounts,
    /// Fail the n-th (1-based) get_next_variable_name call with this status
    pub fail_next_name_at: Option<(usize, Status)>,
    /// Return names without their terminator
    pub drop_terminator: bool,
    /// Answer this many data fetches with BUFFER_TOO_SMALL regardless of the size offered.
    /// One-byte size probes are left alone.
    pub undersize_first_fetches: usize,
    /// Always answer BUFFER_TOO_SMALL, reporting the offered size plus this much
    pub grow_on_undersized: usize,
    /// Fail every get_variable for this name
    pub fail_get_for: Option<(&'static str, Status)>,
    pub fail_set: Option<Status>,
    /// `(data_size, data.len())` of the last get_variable call
    pub last_offered: Option<(usize, usize)>,
}

impl MockFirmware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, guid: Guid, attributes: u32, data: &[u8]) {
        self.vars.push(MockVariable {
            name: wide(name),
            guid,
            attributes,
            data: data.to_vec(),
        });
    }

    fn position(&self, name: &[u16], guid: &Guid) -> Option<usize> {
        let len = name::wide_len(name).ok()?;
        self.vars
            .iter()
            .position(|v| v.guid == *guid && v.name[..v.name.len() - 1] == name[..len])
    }

    fn position_by_str(&self, name: &str) -> Option<usize> {
        let name = wide(name);
        self.vars.iter().position(|v| v.name == name)
    }

    pub fn data_of(&self, name: &str) -> Option<Vec<u8>> {
        self.position_by_str(name).map(|i| self.vars[i].data.clone())
    }

    pub fn attributes_of(&self, name: &str) -> Option<u32> {
        self.position_by_str(name).map(|i| self.vars[i].attributes)
    }

    fn name_matches(&self, index: usize, name: &str) -> bool {
        let decoded: String = self.vars[index].name[..self.vars[index].name.len() - 1]
            .iter()
            .map(|&u| u as u8 as char)
            .collect();
        decoded == name
    }
}

impl VariableServices for MockFirmware {
    fn get_next_variable_name(
        &mut self,
        name_size: &mut usize,
        name: &mut [u16],
        guid: &mut Guid,
    ) -> Status {
        self.calls.next_name += 1;
        if let Some((at, status)) = self.fail_next_name_at {
            if self.calls.next_name == at {
                return status;
            }
        }

        let next = if name.first() == Some(&0) {
            0
        } else {
            match self.position(name, guid) {
                Some(i) => i + 1,
                None => return Status::INVALID_PARAMETER,
            }
        };

        let var = match self.vars.get(next) {
            Some(var) => var,
            None => return Status::NOT_FOUND,
        };

        let units = if self.drop_terminator { var.name.len() - 1 } else { var.name.len() };
        let required = units * 2;
        if *name_size < required || name.len() < units {
            *name_size = required;
            return Status::BUFFER_TOO_SMALL;
        }

        name[..units].copy_from_slice(&var.name[..units]);
        *guid = var.guid;
        *name_size = required;
        Status::SUCCESS
    }

    fn get_variable(
        &mut self,
        name: &[u16],
        guid: &Guid,
        attributes: &mut Attributes,
        data_size: &mut usize,
        data: &mut [u8],
    ) -> Status {
        self.calls.get += 1;
        self.last_offered = Some((*data_size, data.len()));
        if *data_size > data.len() {
            return Status::INVALID_PARAMETER;
        }

        let index = match self.position(name, guid) {
            Some(i) => i,
            None => return Status::NOT_FOUND,
        };
        if let Some((target, status)) = self.fail_get_for {
            if self.name_matches(index, target) {
                return status;
            }
        }

        let var = &self.vars[index];
        *attributes = Attributes(var.attributes);
        if self.grow_on_undersized > 0 {
            *data_size += self.grow_on_undersized;
            return Status::BUFFER_TOO_SMALL;
        }
        if self.undersize_first_fetches > 0 && *data_size > 1 {
            self.undersize_first_fetches -= 1;
            *data_size = var.data.len();
            return Status::BUFFER_TOO_SMALL;
        }
        if *data_size < var.data.len() {
            *data_size = var.data.len();
            return Status::BUFFER_TOO_SMALL;
        }

        data[..var.data.len()].copy_from_slice(&var.data);
        *data_size = var.data.len();
        Status::SUCCESS
    }

    fn set_variable(
        &mut self,
        name: &[u16],
        guid: &Guid,
        attributes: Attributes,
        data: &[u8],
    ) -> Status {
        self.calls.set += 1;
        if let Some(status) = self.fail_set {
            return status;
        }

        match self.position(name, guid) {
            Some(i) => {
                let var = &mut self.vars[i];
                var.attributes = attributes.bits();
                var.data = data.to_vec();
            }
            None => {
                let len = match name::wide_len(name) {
                    Ok(len) => len,
                    Err(_) => return Status::INVALID_PARAMETER,
                };
                self.vars.push(MockVariable {
                    name: name[..len + 1].to_vec(),
                    guid: *guid,
                    attributes: attributes.bits(),
                    data: data.to_vec(),
                });
            }
        }
        Status::SUCCESS
    }
}
