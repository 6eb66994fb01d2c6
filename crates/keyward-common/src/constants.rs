//! Shared constants for Keyward components.

/// Maximum allowed relay factor. Relay fan-out is O(factor) per contacted
/// node, so larger values would amplify load superlinearly.
pub const MAX_RELAY_FACTOR: u8 = 5;

/// Default cluster agent HTTP address
pub const DEFAULT_HTTP_ADDR: &str = "http://127.0.0.1:8811";

/// Default overall request deadline in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Agent API paths
pub mod api {
    /// Keyring operations endpoint (GET for list, POST/PUT/DELETE for writes)
    pub const KEYRING_PATH: &str = "/v1/operator/keyring";
}
