//! Provider registry
//!
//! Resolves the host's provider block into a client and hands out one
//! reconciler per resource type.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thecloud_client::config::API_KEY_ENV;
use thecloud_client::{Client, ClientConfig};
use tracing::{debug, info};

use crate::diagnostics::Outcome;
use crate::lookup::DataSources;
use crate::reconcile::Reconciler;
use crate::resources;

/// Provider block as written by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API endpoint; falls back to `THECLOUD_ENDPOINT`
    pub endpoint: Option<String>,

    /// API key; falls back to `THECLOUD_API_KEY`
    pub api_key: Option<String>,
}

impl ProviderConfig {
    fn has_api_key(&self) -> bool {
        let explicit = self.api_key.as_deref().is_some_and(|key| !key.is_empty());
        explicit || std::env::var(API_KEY_ENV).is_ok_and(|key| !key.is_empty())
    }
}

/// Configured provider
pub struct TheCloudProvider {
    client: Client,
    resources: HashMap<&'static str, Arc<dyn Reconciler>>,
    data_sources: DataSources,
}

impl TheCloudProvider {
    /// Resolve `config` and build the client, reporting problems as diagnostics
    pub fn configure(config: &ProviderConfig) -> Outcome<Self> {
        if !config.has_api_key() {
            return Outcome::error(
                "Missing API Key",
                format!(
                    "The provider cannot create the API client because the API key is missing. \
                     Set the api_key value in the provider configuration or use the {} \
                     environment variable.",
                    API_KEY_ENV
                ),
            );
        }

        let resolved = ClientConfig::resolve(config.endpoint.clone(), config.api_key.clone())
            .and_then(Client::new);
        match resolved {
            Ok(client) => {
                info!("configured provider for {}", client.endpoint());
                Outcome::ok(Self::with_client(client))
            }
            Err(err) => Outcome::error("Unable to Create API Client", err.to_string()),
        }
    }

    /// Build from an existing client
    pub fn with_client(client: Client) -> Self {
        let resources: HashMap<_, _> = resources::all(&client)
            .into_iter()
            .map(|reconciler| (reconciler.descriptor().type_name, reconciler))
            .collect();
        debug!("registered {} resource types", resources.len());

        Self {
            data_sources: DataSources::new(client.clone()),
            client,
            resources,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Reconciler for `type_name`
    pub fn resource(&self, type_name: &str) -> Option<Arc<dyn Reconciler>> {
        self.resources.get(type_name).cloned()
    }

    /// Registered resource type names, sorted
    pub fn resource_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.resources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn data_sources(&self) -> &DataSources {
        &self.data_sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(config: ProviderConfig) -> TheCloudProvider {
        TheCloudProvider::configure(&config)
            .value
            .expect("provider should configure")
    }

    #[test]
    fn test_configure_missing_api_key() {
        temp_env::with_var_unset(API_KEY_ENV, || {
            let outcome = TheCloudProvider::configure(&ProviderConfig::default());
            assert!(outcome.value.is_none());
            let diag = outcome.diagnostics.errors().next().unwrap();
            assert_eq!(diag.summary, "Missing API Key");
            assert!(diag.detail.contains("THECLOUD_API_KEY"));
        });
    }

    #[test]
    fn test_configure_empty_api_key_is_missing() {
        temp_env::with_var_unset(API_KEY_ENV, || {
            let outcome = TheCloudProvider::configure(&ProviderConfig {
                endpoint: None,
                api_key: Some(String::new()),
            });
            assert!(outcome.diagnostics.has_error());
        });
    }

    #[test]
    fn test_configure_invalid_endpoint() {
        let outcome = TheCloudProvider::configure(&ProviderConfig {
            endpoint: Some("ftp://example.com".to_string()),
            api_key: Some("key".to_string()),
        });
        let diag = outcome.diagnostics.errors().next().unwrap();
        assert_eq!(diag.summary, "Unable to Create API Client");
    }

    #[test]
    fn test_configure_from_env() {
        temp_env::with_vars(
            [
                (API_KEY_ENV, Some("env-key")),
                ("THECLOUD_ENDPOINT", Some("https://api.example.com/")),
            ],
            || {
                let provider = configured(ProviderConfig::default());
                assert_eq!(provider.client().endpoint(), "https://api.example.com");
            },
        );
    }

    #[test]
    fn test_resource_registry() {
        let provider = configured(ProviderConfig {
            endpoint: None,
            api_key: Some("key".to_string()),
        });

        let types = provider.resource_types();
        assert_eq!(types.len(), 28);
        assert!(types.contains(&"thecloud_vpc"));
        assert!(types.contains(&"thecloud_elastic_ip_association"));
        assert!(types.contains(&"thecloud_kubernetes_cluster"));

        let vpc = provider.resource("thecloud_vpc").unwrap();
        assert_eq!(vpc.descriptor().display_name, "VPC");
        assert!(provider.resource("thecloud_nothing").is_none());
    }

    #[test]
    fn test_provider_config_deserializes_partial_block() {
        let config: ProviderConfig = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert!(config.endpoint.is_none());
    }
}
