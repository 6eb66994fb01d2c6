//! Pool dispatch.
//!
//! Maps one encoded command onto the matching agent verb. The agent fans
//! the call out to every pool internally; the returned collection, in the
//! order the agent produced it, is the authoritative result set. A
//! transport failure here is fatal for the whole invocation since no pool
//! responses were collected.

use keyward_common::{KeywardError, PoolResponse, QueryOptions, WriteOptions};

use crate::client::ClusterClient;
use crate::command::KeyringCommand;
use crate::policy::Options;

/// Issue the single network call for this invocation
pub async fn dispatch(
    client: &dyn ClusterClient,
    cmd: &KeyringCommand,
    opts: &Options,
) -> Result<Vec<PoolResponse>, KeywardError> {
    tracing::debug!(
        relay_factor = opts.relay_factor.value(),
        local_only = opts.local_only,
        mutating = cmd.is_mutating(),
        "Dispatching keyring command"
    );

    let query = QueryOptions {
        relay_factor: opts.relay_factor,
        local_only: opts.local_only,
    };
    let write = WriteOptions {
        relay_factor: opts.relay_factor,
    };

    match cmd {
        KeyringCommand::List => client.list(&query).await,
        KeyringCommand::ListPrimary => client.list_primary(&query).await,
        KeyringCommand::Install(key) => client.install(key, &write).await,
        KeyringCommand::Use(key) => client.use_key(key, &write).await,
        KeyringCommand::Remove(key) => client.remove(key, &write).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use keyward_common::{PoolId, RelayFactor};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List(QueryOptions),
        ListPrimary(QueryOptions),
        Install(String, WriteOptions),
        Use(String, WriteOptions),
        Remove(String, WriteOptions),
    }

    /// Records every verb invocation and replays canned pool responses
    struct StubClient {
        calls: Mutex<Vec<Call>>,
        pools: Vec<PoolResponse>,
    }

    impl StubClient {
        fn new(pools: Vec<PoolResponse>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                pools,
            }
        }

        fn record(&self, call: Call) -> Result<Vec<PoolResponse>, KeywardError> {
            self.calls.lock().unwrap().push(call);
            Ok(self.pools.clone())
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ClusterClient for StubClient {
        async fn list(&self, opts: &QueryOptions) -> Result<Vec<PoolResponse>, KeywardError> {
            self.record(Call::List(*opts))
        }

        async fn list_primary(
            &self,
            opts: &QueryOptions,
        ) -> Result<Vec<PoolResponse>, KeywardError> {
            self.record(Call::ListPrimary(*opts))
        }

        async fn install(
            &self,
            key: &str,
            opts: &WriteOptions,
        ) -> Result<Vec<PoolResponse>, KeywardError> {
            self.record(Call::Install(key.to_string(), *opts))
        }

        async fn use_key(
            &self,
            key: &str,
            opts: &WriteOptions,
        ) -> Result<Vec<PoolResponse>, KeywardError> {
            self.record(Call::Use(key.to_string(), *opts))
        }

        async fn remove(
            &self,
            key: &str,
            opts: &WriteOptions,
        ) -> Result<Vec<PoolResponse>, KeywardError> {
            self.record(Call::Remove(key.to_string(), *opts))
        }
    }

    fn options(relay: i64, local_only: bool) -> Options {
        Options {
            relay_factor: RelayFactor::parse(relay).unwrap(),
            local_only,
        }
    }

    #[tokio::test]
    async fn test_list_uses_query_verb_with_options() {
        let client = StubClient::new(vec![]);
        dispatch(&client, &KeyringCommand::List, &options(2, true))
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            Call::List(QueryOptions {
                relay_factor: RelayFactor::parse(2).unwrap(),
                local_only: true,
            })
        );
    }

    #[tokio::test]
    async fn test_list_primary_uses_its_own_verb() {
        let client = StubClient::new(vec![]);
        dispatch(&client, &KeyringCommand::ListPrimary, &options(0, false))
            .await
            .unwrap();
        assert!(matches!(client.calls()[0], Call::ListPrimary(_)));
    }

    #[tokio::test]
    async fn test_writes_carry_key_and_write_options() {
        let client = StubClient::new(vec![]);
        let opts = options(4, false);

        dispatch(&client, &KeyringCommand::Install("k1".to_string()), &opts)
            .await
            .unwrap();
        dispatch(&client, &KeyringCommand::Use("k2".to_string()), &opts)
            .await
            .unwrap();
        dispatch(&client, &KeyringCommand::Remove("k3".to_string()), &opts)
            .await
            .unwrap();

        let write = WriteOptions {
            relay_factor: RelayFactor::parse(4).unwrap(),
        };
        assert_eq!(
            client.calls(),
            vec![
                Call::Install("k1".to_string(), write),
                Call::Use("k2".to_string(), write),
                Call::Remove("k3".to_string(), write),
            ]
        );
    }

    #[tokio::test]
    async fn test_validation_failures_never_reach_the_client() {
        use crate::command::ActionFlags;
        use crate::policy::{RawOptions, validate};

        let client = StubClient::new(vec![]);

        // Ambiguous action selection fails at encode time
        let flags = ActionFlags {
            install: Some("k1".to_string()),
            remove: Some("k2".to_string()),
            ..Default::default()
        };
        assert!(KeyringCommand::from_flags(&flags).is_err());

        // Relay factor out of range fails at validation time
        let raw = RawOptions {
            relay_factor: 6,
            local_only: false,
        };
        let cmd = KeyringCommand::Install("k1".to_string());
        assert!(validate(&raw, &cmd).is_err());

        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pool_order_is_preserved() {
        let pools = vec![
            PoolResponse::empty(PoolId::lan("dc2"), 4),
            PoolResponse::empty(PoolId::lan("dc1"), 3),
            PoolResponse::empty(PoolId::wan("dc1"), 7),
        ];
        let client = StubClient::new(pools.clone());

        let returned = dispatch(&client, &KeyringCommand::List, &options(0, false))
            .await
            .unwrap();
        let sites: Vec<_> = returned.iter().map(|p| p.pool.site.as_str()).collect();
        assert_eq!(sites, vec!["dc2", "dc1", "dc1"]);
    }
}
