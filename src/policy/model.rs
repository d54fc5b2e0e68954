//! Core vocabulary for policy decisions: operations, permission bits,
//! snapshot row types and verdict structures.

use serde::{Deserialize, Serialize};

/// File operations the engine recognizes. Role tables may carry additional
/// operation names; those stay strings and fall through RBAC's closed-world
/// lookup, but DAC and MAC only classify the names listed here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    Stat,
    Realpath,
    Opendir,
    Readdir,
    Write,
    Create,
    Mkdir,
    Delete,
}

/// MAC classification: read-like operations move data toward the caller,
/// write-like operations move data into the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    ReadLike,
    WriteLike,
}

/// The DAC permission bit an operation is tested against for non-owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermBit {
    Read,
    Write,
    Exec,
}

impl PermBit {
    pub fn label(&self) -> &'static str {
        match self {
            PermBit::Read => "read",
            PermBit::Write => "write",
            PermBit::Exec => "execute",
        }
    }
}

impl Operation {
    pub fn from_name(name: &str) -> Option<Operation> {
        match name {
            "read" => Some(Operation::Read),
            "stat" => Some(Operation::Stat),
            "realpath" => Some(Operation::Realpath),
            "opendir" => Some(Operation::Opendir),
            "readdir" => Some(Operation::Readdir),
            "write" => Some(Operation::Write),
            "create" => Some(Operation::Create),
            "mkdir" => Some(Operation::Mkdir),
            "delete" => Some(Operation::Delete),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Stat => "stat",
            Operation::Realpath => "realpath",
            Operation::Opendir => "opendir",
            Operation::Readdir => "readdir",
            Operation::Write => "write",
            Operation::Create => "create",
            Operation::Mkdir => "mkdir",
            Operation::Delete => "delete",
        }
    }

    pub fn class(&self) -> OpClass {
        match self {
            Operation::Read
            | Operation::Stat
            | Operation::Realpath
            | Operation::Opendir
            | Operation::Readdir => OpClass::ReadLike,
            Operation::Write | Operation::Create | Operation::Mkdir | Operation::Delete => {
                OpClass::WriteLike
            }
        }
    }

    /// Permission bit tested for non-owners: read-like operations need `r`,
    /// write/create/mkdir need `w`, delete needs `x`.
    pub fn dac_bit(&self) -> PermBit {
        match self {
            Operation::Read
            | Operation::Stat
            | Operation::Realpath
            | Operation::Opendir
            | Operation::Readdir => PermBit::Read,
            Operation::Write | Operation::Create | Operation::Mkdir => PermBit::Write,
            Operation::Delete => PermBit::Exec,
        }
    }
}

/// Permission triple parsed from a flag string: any occurrence of `r`, `w`
/// or `x` sets the corresponding bit, every other character is ignored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermBits {
    pub read: bool,
    pub write: bool,
    pub exec: bool,
}

impl PermBits {
    pub fn parse(flags: &str) -> Self {
        Self {
            read: flags.contains('r'),
            write: flags.contains('w'),
            exec: flags.contains('x'),
        }
    }

    pub fn has(&self, bit: PermBit) -> bool {
        match bit {
            PermBit::Read => self.read,
            PermBit::Write => self.write,
            PermBit::Exec => self.exec,
        }
    }

    pub fn render(&self) -> String {
        let mut s = String::with_capacity(3);
        s.push(if self.read { 'r' } else { '-' });
        s.push(if self.write { 'w' } else { '-' });
        s.push(if self.exec { 'x' } else { '-' });
        s
    }
}

/// Ownership entry for a path subtree: the owner bypasses the bits entirely,
/// everyone else is tested against them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnershipRecord {
    pub owner: String,
    pub perms: PermBits,
}

/// Per-user snapshot entry: clearance level name plus role memberships.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub clearance: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The three access-control models, in their fixed evaluation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Model {
    Dac,
    Mac,
    Rbac,
}

impl Model {
    pub fn name(&self) -> &'static str {
        match self {
            Model::Dac => "DAC",
            Model::Mac => "MAC",
            Model::Rbac => "RBAC",
        }
    }
}

/// One model's verdict with its human-readable detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelVerdict {
    pub model: Model,
    pub allowed: bool,
    pub detail: String,
}

impl ModelVerdict {
    pub fn allow(model: Model, detail: impl Into<String>) -> Self {
        Self { model, allowed: true, detail: detail.into() }
    }
    pub fn deny(model: Model, detail: impl Into<String>) -> Self {
        Self { model, allowed: false, detail: detail.into() }
    }
}

/// Combined decision: overall grant flag, the three per-model verdicts in
/// evaluation order, and the assembled reason string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub granted: bool,
    pub verdicts: Vec<ModelVerdict>,
    pub reason: String,
}
