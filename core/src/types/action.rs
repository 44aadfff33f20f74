use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Whether a membership entry is being added to or removed from a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Add,
    Remove,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Add => "Add",
            Action::Remove => "Remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Add" => Ok(Action::Add),
            "Remove" => Ok(Action::Remove),
            other => Err(Error::invalid(format!(
                "\"{other}\" is not a valid action. Valid actions are: Add, Remove"
            ))),
        }
    }
}

/// Grant or revoke a single group permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionAction {
    Grant,
    Deny,
}

impl PermissionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionAction::Grant => "Grant",
            PermissionAction::Deny => "Deny",
        }
    }
}

impl FromStr for PermissionAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Grant" => Ok(PermissionAction::Grant),
            "Deny" => Ok(PermissionAction::Deny),
            other => Err(Error::invalid(format!(
                "\"{other}\" is not a valid permission action. Valid actions are: Grant, Deny"
            ))),
        }
    }
}
