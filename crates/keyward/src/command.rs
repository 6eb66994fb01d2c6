//! Keyring command encoding.
//!
//! Collapses the raw action flags into a single tagged command. Exactly
//! one action may be selected per invocation; ambiguous input is rejected
//! here, before options are validated or any pool is contacted.

use keyward_common::KeywardError;

/// Raw action flags as parsed from the command line
#[derive(Debug, Clone, Default)]
pub struct ActionFlags {
    /// Key to install across the cluster
    pub install: Option<String>,
    /// Key to promote to primary
    pub use_key: Option<String>,
    /// Key to remove from the cluster
    pub remove: Option<String>,
    /// List all installed keys
    pub list: bool,
    /// List primary keys only
    pub list_primary: bool,
}

/// One keyring operation, carrying its key argument where applicable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyringCommand {
    List,
    ListPrimary,
    Install(String),
    Use(String),
    Remove(String),
}

impl KeyringCommand {
    /// Build the command from raw flags, rejecting zero or multiple actions
    pub fn from_flags(flags: &ActionFlags) -> Result<Self, KeywardError> {
        let mut selected = Vec::new();

        if flags.list {
            selected.push(KeyringCommand::List);
        }
        if flags.list_primary {
            selected.push(KeyringCommand::ListPrimary);
        }
        if let Some(key) = &flags.install {
            selected.push(KeyringCommand::Install(key.clone()));
        }
        if let Some(key) = &flags.use_key {
            selected.push(KeyringCommand::Use(key.clone()));
        }
        if let Some(key) = &flags.remove {
            selected.push(KeyringCommand::Remove(key.clone()));
        }

        match selected.len() {
            0 => Err(KeywardError::NoCommandSpecified),
            1 => Ok(selected.remove(0)),
            _ => Err(KeywardError::MultipleCommandsSpecified),
        }
    }

    /// Returns true for commands that change keyring state on the nodes
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            KeyringCommand::Install(_) | KeyringCommand::Use(_) | KeyringCommand::Remove(_)
        )
    }

    /// Progress line printed before dispatch
    pub fn describe(&self) -> &'static str {
        match self {
            KeyringCommand::List => "Gathering installed encryption keys...",
            KeyringCommand::ListPrimary => "Gathering installed primary encryption keys...",
            KeyringCommand::Install(_) => "Installing new gossip encryption key...",
            KeyringCommand::Use(_) => "Changing primary gossip encryption key...",
            KeyringCommand::Remove(_) => "Removing gossip encryption key...",
        }
    }
}
