//! Option validation policies.
//!
//! Both checks run before the dispatcher is handed the command; an
//! invalid option never reaches the network layer.

use keyward_common::{KeywardError, RelayFactor};

use crate::command::KeyringCommand;

/// Options as received from the command line, not yet validated
#[derive(Debug, Clone, Copy, Default)]
pub struct RawOptions {
    pub relay_factor: i64,
    pub local_only: bool,
}

/// Options that passed relay and scope validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub relay_factor: RelayFactor,
    pub local_only: bool,
}

/// Validate raw options against the command they accompany.
///
/// Mutating commands must reach every pool including wide-area so the
/// LAN and WAN keyrings stay in lock-step; restricting them locally
/// would silently desynchronize the two. Read commands may be scoped
/// since a stale read is acceptable.
pub fn validate(raw: &RawOptions, cmd: &KeyringCommand) -> Result<Options, KeywardError> {
    let relay_factor = RelayFactor::parse(raw.relay_factor)?;

    if raw.local_only && cmd.is_mutating() {
        return Err(KeywardError::InvalidScope(
            "local-only can only be set for list commands".to_string(),
        ));
    }

    Ok(Options {
        relay_factor,
        local_only: raw.local_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_only_rejected_for_mutating_commands() {
        let raw = RawOptions {
            relay_factor: 0,
            local_only: true,
        };

        for cmd in [
            KeyringCommand::Install("k".to_string()),
            KeyringCommand::Use("k".to_string()),
            KeyringCommand::Remove("k".to_string()),
        ] {
            assert!(matches!(
                validate(&raw, &cmd),
                Err(KeywardError::InvalidScope(_))
            ));
        }
    }

    #[test]
    fn test_local_only_allowed_for_reads() {
        let raw = RawOptions {
            relay_factor: 2,
            local_only: true,
        };

        for cmd in [KeyringCommand::List, KeyringCommand::ListPrimary] {
            let opts = validate(&raw, &cmd).unwrap();
            assert!(opts.local_only);
            assert_eq!(opts.relay_factor.value(), 2);
        }
    }

    #[test]
    fn test_relay_factor_out_of_range_rejected() {
        for relay_factor in [-1, 6, 100] {
            let raw = RawOptions {
                relay_factor,
                local_only: false,
            };
            assert!(matches!(
                validate(&raw, &KeyringCommand::List),
                Err(KeywardError::InvalidRelayFactor(v)) if v == relay_factor
            ));
        }
    }

    #[test]
    fn test_relay_check_runs_before_scope_check() {
        let raw = RawOptions {
            relay_factor: 6,
            local_only: true,
        };
        assert!(matches!(
            validate(&raw, &KeyringCommand::Install("k".to_string())),
            Err(KeywardError::InvalidRelayFactor(6))
        ));
    }
}
