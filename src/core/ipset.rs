use crate::core::errors::{Error, Result};
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/*-------------------------------------------------------------------------------------------------
  Scope
-------------------------------------------------------------------------------------------------*/

/// Scope an IP set is defined in. `CLOUDFRONT` sets live in `us-east-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Scope {
    #[serde(rename = "REGIONAL")]
    Regional,
    #[serde(rename = "CLOUDFRONT")]
    CloudFront,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Regional => "REGIONAL",
            Scope::CloudFront => "CLOUDFRONT",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "REGIONAL" => Ok(Scope::Regional),
            "CLOUDFRONT" => Ok(Scope::CloudFront),
            _ => Err(Error::config(format!("Invalid scope: {}", value))),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  IP Set Data Structures
-------------------------------------------------------------------------------------------------*/

/// Summary of an IP set as returned by a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSetSummary {
    pub name: String,
    pub id: String,
    pub lock_token: String,
}

/// Full replacement of an IP set's address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSetUpdate {
    pub name: String,
    pub id: String,
    pub scope: Scope,
    pub description: String,
    pub addresses: Vec<String>,
    pub lock_token: String,
}

/// Response of a successful update; the lock token to use for the next write.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpdateIpSetResponse {
    #[serde(rename = "NextLockToken")]
    pub next_lock_token: String,
}

/*-------------------------------------------------------------------------------------------------
  IP Set Store
-------------------------------------------------------------------------------------------------*/

/// Client for the managed IP set API.
///
/// Implementations make exactly one logical API request per call and never retry. A write with a
/// stale lock token must fail with [Error::Conflict] and leave the set unchanged.
#[async_trait]
pub trait IpSetStore: Send + Sync {
    /// List every IP set in `scope`, following pagination to the end.
    async fn list_ip_sets(&self, scope: Scope) -> Result<Vec<IpSetSummary>>;

    /// Replace the address list of an IP set.
    async fn update_ip_set(&self, update: IpSetUpdate) -> Result<UpdateIpSetResponse>;
}

/*-------------------------------------------------------------------------------------------------
  Update Step
-------------------------------------------------------------------------------------------------*/

pub fn ip_set_description(service: &str, label: &str) -> String {
    format!("IP Address ranges for service {} as of {}", service, label)
}

/// Find the IP set named `name` in `scope`.
pub async fn find_ip_set<S>(store: &S, name: &str, scope: Scope) -> Result<IpSetSummary>
where
    S: IpSetStore + ?Sized,
{
    store
        .list_ip_sets(scope)
        .await?
        .into_iter()
        .find(|ip_set| ip_set.name == name)
        .ok_or_else(|| Error::not_found(format!("IP set {} in scope {}", name, scope)))
}

/// Replace the addresses of the IP set named `name` with `prefixes`, written as given, using the
/// lock token read immediately before the write.
pub async fn replace_addresses<S>(
    store: &S,
    name: &str,
    scope: Scope,
    description: String,
    prefixes: &[String],
) -> Result<UpdateIpSetResponse>
where
    S: IpSetStore + ?Sized,
{
    let ip_set = find_ip_set(store, name, scope).await?;
    info!("Found IP set {} (id {})", ip_set.name, ip_set.id);

    let update = IpSetUpdate {
        name: ip_set.name,
        id: ip_set.id,
        scope,
        description,
        addresses: prefixes.to_vec(),
        lock_token: ip_set.lock_token,
    };

    info!(
        "Updating IP set {} with {} address(es)",
        update.name,
        update.addresses.len()
    );
    store.update_ip_set(update).await
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use test_log::test;

    /*----------------------------------------------------------------------------------
      In-Memory IP Set Store
    ----------------------------------------------------------------------------------*/

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct StoredIpSet {
        pub name: String,
        pub id: String,
        pub scope: Scope,
        pub description: String,
        pub addresses: Vec<String>,
        pub lock_token: String,
    }

    /// IP set store that keeps its sets in memory and rotates the lock token on every write.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryIpSetStore {
        sets: Mutex<Vec<StoredIpSet>>,
        writes: Mutex<u32>,
        touch_after_list: Mutex<Option<String>>,
    }

    impl MemoryIpSetStore {
        pub(crate) fn with_set(name: &str, scope: Scope) -> Self {
            let store = Self::default();
            store.insert(name, scope);
            store
        }

        pub(crate) fn insert(&self, name: &str, scope: Scope) {
            let mut sets = self.sets.lock().unwrap();
            let index = sets.len();
            sets.push(StoredIpSet {
                name: name.to_string(),
                id: format!("id-{}", index),
                scope,
                description: String::new(),
                addresses: vec!["192.0.2.0/24".to_string()],
                lock_token: format!("token-{}-0", index),
            });
        }

        pub(crate) fn get(&self, name: &str) -> Option<StoredIpSet> {
            self.sets
                .lock()
                .unwrap()
                .iter()
                .find(|ip_set| ip_set.name == name)
                .cloned()
        }

        /// Simulate a concurrent writer by rotating the lock token of `name`.
        pub(crate) fn touch(&self, name: &str) {
            let mut sets = self.sets.lock().unwrap();
            if let Some(ip_set) = sets.iter_mut().find(|ip_set| ip_set.name == name) {
                ip_set.lock_token.push_str("-touched");
            }
        }

        /// Rotate the lock token of `name` right after the next list call returns, as a writer
        /// racing between the read and the update would.
        pub(crate) fn touch_after_next_list(&self, name: &str) {
            *self.touch_after_list.lock().unwrap() = Some(name.to_string());
        }

        pub(crate) fn write_count(&self) -> u32 {
            *self.writes.lock().unwrap()
        }
    }

    #[async_trait]
    impl IpSetStore for MemoryIpSetStore {
        async fn list_ip_sets(&self, scope: Scope) -> Result<Vec<IpSetSummary>> {
            let summaries = self
                .sets
                .lock()
                .unwrap()
                .iter()
                .filter(|ip_set| ip_set.scope == scope)
                .map(|ip_set| IpSetSummary {
                    name: ip_set.name.clone(),
                    id: ip_set.id.clone(),
                    lock_token: ip_set.lock_token.clone(),
                })
                .collect();

            let touched = self.touch_after_list.lock().unwrap().take();
            if let Some(name) = touched {
                self.touch(&name);
            }

            Ok(summaries)
        }

        async fn update_ip_set(&self, update: IpSetUpdate) -> Result<UpdateIpSetResponse> {
            let mut sets = self.sets.lock().unwrap();
            let ip_set = sets
                .iter_mut()
                .find(|ip_set| ip_set.id == update.id && ip_set.scope == update.scope)
                .ok_or_else(|| Error::not_found(update.id.clone()))?;

            if ip_set.lock_token != update.lock_token {
                return Err(Error::conflict(format!(
                    "stale lock token for IP set {}",
                    update.name
                )));
            }

            let mut writes = self.writes.lock().unwrap();
            *writes += 1;

            ip_set.description = update.description;
            ip_set.addresses = update.addresses;
            ip_set.lock_token = format!("{}-{}", ip_set.id, *writes);

            Ok(UpdateIpSetResponse {
                next_lock_token: ip_set.lock_token.clone(),
            })
        }
    }

    /*----------------------------------------------------------------------------------
      Scope
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_scope_from_str() {
        assert_eq!("REGIONAL".parse::<Scope>().unwrap(), Scope::Regional);
        assert_eq!("CLOUDFRONT".parse::<Scope>().unwrap(), Scope::CloudFront);
        assert!("regional".parse::<Scope>().is_err());
        assert_eq!(Scope::CloudFront.to_string(), "CLOUDFRONT");
    }

    /*----------------------------------------------------------------------------------
      Update Step
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_ip_set_description() {
        assert_eq!(
            ip_set_description("CLOUDFRONT", "Initial Seed"),
            "IP Address ranges for service CLOUDFRONT as of Initial Seed"
        );
    }

    #[test(tokio::test)]
    async fn test_replace_addresses() {
        let store = MemoryIpSetStore::with_set("CloudFront-IPs", Scope::Regional);
        store.insert("Other-IPs", Scope::Regional);
        let prefixes = vec!["10.0.0.0/8".to_string(), "10.1.0.0/16".to_string()];

        let response = replace_addresses(
            &store,
            "CloudFront-IPs",
            Scope::Regional,
            "description".to_string(),
            &prefixes,
        )
        .await
        .unwrap();

        let ip_set = store.get("CloudFront-IPs").unwrap();
        assert_eq!(ip_set.addresses, vec!["10.0.0.0/8", "10.1.0.0/16"]);
        assert_eq!(ip_set.description, "description");
        assert_eq!(response.next_lock_token, ip_set.lock_token);

        // Untouched neighbour
        let other = store.get("Other-IPs").unwrap();
        assert_eq!(other.addresses, vec!["192.0.2.0/24"]);
    }

    #[test(tokio::test)]
    async fn test_find_ip_set_respects_scope() {
        let store = MemoryIpSetStore::with_set("CloudFront-IPs", Scope::CloudFront);
        let result = find_ip_set(&store, "CloudFront-IPs", Scope::Regional).await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        let ip_set = find_ip_set(&store, "CloudFront-IPs", Scope::CloudFront)
            .await
            .unwrap();
        assert_eq!(ip_set.id, "id-0");
    }

    #[test(tokio::test)]
    async fn test_stale_lock_token_conflicts() {
        let store = MemoryIpSetStore::with_set("CloudFront-IPs", Scope::Regional);
        let stale = find_ip_set(&store, "CloudFront-IPs", Scope::Regional)
            .await
            .unwrap();
        store.touch("CloudFront-IPs");

        let result = store
            .update_ip_set(IpSetUpdate {
                name: stale.name,
                id: stale.id,
                scope: Scope::Regional,
                description: "new".to_string(),
                addresses: vec!["10.0.0.0/8".to_string()],
                lock_token: stale.lock_token,
            })
            .await;

        assert!(matches!(result, Err(Error::Conflict(_))));
        let ip_set = store.get("CloudFront-IPs").unwrap();
        assert_eq!(ip_set.addresses, vec!["192.0.2.0/24"]);
        assert_eq!(store.write_count(), 0);
    }
}
