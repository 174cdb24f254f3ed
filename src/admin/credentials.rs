//! Replacing API credentials across all stored clients with a single
//! integration pair.

use tracing::info;

use crate::store::ClientStore;

/// Summary of a credential replacement run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialsReplaced {
    /// How many client records were updated.
    pub updated: usize,
}

/// Overwrites the public id and secret of every stored API client.
pub fn replace_all<S>(store: &mut S, client_id: &str, secret: &str) -> CredentialsReplaced
where
    S: ClientStore,
{
    let clients = store.clients();
    let updated = clients.len();

    for mut client in clients {
        info!("Updating credentials for {} ({}).", client.name, client.id);
        client.random_id = client_id.to_string();
        client.secret = secret.to_string();
        store.save_client(client);
    }

    CredentialsReplaced { updated }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::ApiClient;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_every_client_is_updated() {
        let mut store = MemoryStore::new();
        for id in 1..=3 {
            store.save_client(ApiClient {
                id,
                name: format!("integration-{}", id),
                random_id: format!("{}_old", id),
                secret: "old-secret".to_string(),
            });
        }

        let result = replace_all(&mut store, "new-id", "new-secret");

        assert_eq!(result, CredentialsReplaced { updated: 3 });
        for client in store.clients() {
            assert_eq!(client.random_id, "new-id");
            assert_eq!(client.secret, "new-secret");
        }
    }

    #[test]
    fn test_empty_store_updates_nothing() {
        let mut store = MemoryStore::new();

        let result = replace_all(&mut store, "new-id", "new-secret");

        assert_eq!(result.updated, 0);
    }
}
