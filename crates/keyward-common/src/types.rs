//! Wire types shared between the Keyward CLI and the cluster agent API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::MAX_RELAY_FACTOR;
use crate::error::KeywardError;

/// Relay fan-out factor (0-5)
///
/// Controls how many additional randomly-chosen peers each directly
/// contacted node consults before replying upward.
///
/// - 0: direct dispatch, no indirection
/// - 1-5: each contacted node relays through this many extra peers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelayFactor(u8);

impl RelayFactor {
    pub const MAX: RelayFactor = RelayFactor(MAX_RELAY_FACTOR);
    pub const NONE: RelayFactor = RelayFactor(0);

    /// Validate a requested relay factor, rejecting values outside [0, 5]
    pub fn parse(value: i64) -> Result<Self, KeywardError> {
        if !(0..=i64::from(MAX_RELAY_FACTOR)).contains(&value) {
            return Err(KeywardError::InvalidRelayFactor(value));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true when responses flow back without indirection
    pub fn is_direct(&self) -> bool {
        self.0 == 0
    }
}

/// Identity of one independent communication pool
///
/// A node belongs to exactly one local pool and, if topology allows,
/// the single wide-area pool. Pools are never nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolId {
    /// Site this pool belongs to
    pub site: String,

    /// True for the single cross-site pool
    #[serde(default)]
    pub wan: bool,

    /// Named network segment within the site, if the site is subdivided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

impl PoolId {
    /// A site-local pool
    pub fn lan(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            wan: false,
            segment: None,
        }
    }

    /// The wide-area pool
    pub fn wan(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            wan: true,
            segment: None,
        }
    }
}

/// Whether a node-keyed message is merely informational or marks a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

/// Diagnostic message reported by a single node
///
/// The severity tag is the only error criterion; message text is never
/// inspected for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMessage {
    pub severity: Severity,
    pub text: String,
}

impl NodeMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// One pool's answer to a keyring operation
///
/// Invariant: every count in `keys` and `primary_keys` is at most
/// `num_nodes`. Map iteration order is unspecified; presentation order
/// is imposed at format time only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolResponse {
    /// Pool this response came from
    pub pool: PoolId,

    /// Pool-level failure: set when the pool did not respond at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Diagnostic messages keyed by responding node
    #[serde(default)]
    pub messages: HashMap<String, NodeMessage>,

    /// Installed key fingerprint -> number of nodes reporting it
    #[serde(default)]
    pub keys: HashMap<String, usize>,

    /// Primary key fingerprint -> number of nodes encrypting with it
    #[serde(default)]
    pub primary_keys: HashMap<String, usize>,

    /// Total node count in the pool
    pub num_nodes: usize,
}

impl PoolResponse {
    /// A response carrying no data yet, for a known pool
    pub fn empty(pool: PoolId, num_nodes: usize) -> Self {
        Self {
            pool,
            error: None,
            messages: HashMap::new(),
            keys: HashMap::new(),
            primary_keys: HashMap::new(),
            num_nodes,
        }
    }

    /// Returns true if this pool failed to respond or any node reported
    /// an error-severity message
    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.messages.values().any(NodeMessage::is_error)
    }
}

/// Options for read operations (list, list-primary)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub relay_factor: RelayFactor,
    pub local_only: bool,
}

/// Options for mutating operations (install, use, remove)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    pub relay_factor: RelayFactor,
}
