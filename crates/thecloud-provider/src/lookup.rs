//! Data source lookups
//!
//! Singular data sources find one resource by `id` (singleton GET) or by
//! `name` (list and scan). Plural data sources list a whole collection.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thecloud_client::{self as api, Client};
use tracing::debug;

use crate::diagnostics::{CLIENT_ERROR, Outcome};
use crate::error::{ProviderError, Result};
use crate::reconcile::{observe, observe_opt};
use crate::state::ResourceState;

/// How a singular data source selects its resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(String),
    Name(String),
}

impl Lookup {
    /// `id` wins over `name`; one of them is required
    pub fn from_state(config: &ResourceState) -> Result<Self> {
        if let Some(id) = config.str_attr("id") {
            return Ok(Lookup::Id(id.to_string()));
        }
        config
            .str_attr("name")
            .map(|name| Lookup::Name(name.to_string()))
            .ok_or(ProviderError::MissingLookupKey)
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Id(id) => write!(f, "id {:?}", id),
            Lookup::Name(name) => write!(f, "name {:?}", name),
        }
    }
}

/// Resources that can be matched by name
pub trait Named {
    fn name(&self) -> &str;
    fn id(&self) -> &str;
}

macro_rules! impl_named {
    ($($ty:ty),* $(,)?) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_named!(
    api::Vpc,
    api::Instance,
    api::Subnet,
    api::Database,
    api::Cluster,
    api::Function,
    api::GatewayRoute,
    api::Bucket,
);

/// First item whose name matches
pub fn find_by_name<T: Named>(items: Vec<T>, name: &str) -> Option<T> {
    items.into_iter().find(|item| item.name() == name)
}

fn find_by_id<T: Named>(items: Vec<T>, id: &str) -> Option<T> {
    items.into_iter().find(|item| item.id() == id)
}

/// Singular data sources and the display name used in diagnostics
pub const SINGULAR: &[(&str, &str)] = &[
    ("thecloud_vpc", "VPC"),
    ("thecloud_instance", "Instance"),
    ("thecloud_subnet", "Subnet"),
    ("thecloud_database", "Database"),
    ("thecloud_kubernetes_cluster", "Cluster"),
    ("thecloud_function", "Function"),
    ("thecloud_gateway_route", "Gateway Route"),
    ("thecloud_bucket", "Bucket"),
];

/// Plural data sources and the attribute their items are stored under
pub const PLURAL: &[(&str, &str)] = &[
    ("thecloud_vpcs", "vpcs"),
    ("thecloud_instances", "instances"),
    ("thecloud_subnets", "subnets"),
    ("thecloud_databases", "databases"),
    ("thecloud_kubernetes_clusters", "clusters"),
    ("thecloud_functions", "functions"),
    ("thecloud_gateway_routes", "routes"),
    ("thecloud_buckets", "buckets"),
];

/// Data source reader
#[derive(Debug, Clone)]
pub struct DataSources {
    client: Client,
}

impl DataSources {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> {
        SINGULAR.iter().chain(PLURAL).map(|(name, _)| *name)
    }

    pub async fn find_vpc(&self, lookup: &Lookup) -> Result<Option<api::Vpc>> {
        Ok(match lookup {
            Lookup::Id(id) => self.client.get_vpc(id).await?,
            Lookup::Name(name) => find_by_name(self.client.list_vpcs().await?, name),
        })
    }

    pub async fn find_instance(&self, lookup: &Lookup) -> Result<Option<api::Instance>> {
        Ok(match lookup {
            Lookup::Id(id) => self.client.get_instance(id).await?,
            Lookup::Name(name) => find_by_name(self.client.list_instances().await?, name),
        })
    }

    /// Name lookups are scoped to `vpc_id`
    pub async fn find_subnet(
        &self,
        lookup: &Lookup,
        vpc_id: Option<&str>,
    ) -> Result<Option<api::Subnet>> {
        Ok(match lookup {
            Lookup::Id(id) => self.client.get_subnet(id).await?,
            Lookup::Name(name) => {
                let vpc_id =
                    vpc_id.ok_or_else(|| ProviderError::MissingAttribute("vpc_id".to_string()))?;
                find_by_name(self.client.list_subnets(vpc_id).await?, name)
            }
        })
    }

    pub async fn find_database(&self, lookup: &Lookup) -> Result<Option<api::Database>> {
        Ok(match lookup {
            Lookup::Id(id) => self.client.get_database(id).await?,
            Lookup::Name(name) => find_by_name(self.client.list_databases().await?, name),
        })
    }

    pub async fn find_cluster(&self, lookup: &Lookup) -> Result<Option<api::Cluster>> {
        Ok(match lookup {
            Lookup::Id(id) => self.client.get_cluster(id).await?,
            Lookup::Name(name) => find_by_name(self.client.list_clusters().await?, name),
        })
    }

    pub async fn find_function(&self, lookup: &Lookup) -> Result<Option<api::Function>> {
        Ok(match lookup {
            Lookup::Id(id) => self.client.get_function(id).await?,
            Lookup::Name(name) => find_by_name(self.client.list_functions().await?, name),
        })
    }

    pub async fn find_gateway_route(&self, lookup: &Lookup) -> Result<Option<api::GatewayRoute>> {
        Ok(match lookup {
            Lookup::Id(id) => self.client.get_gateway_route(id).await?,
            Lookup::Name(name) => find_by_name(self.client.list_gateway_routes().await?, name),
        })
    }

    /// Buckets are keyed by name, so an id lookup scans the listing
    pub async fn find_bucket(&self, lookup: &Lookup) -> Result<Option<api::Bucket>> {
        Ok(match lookup {
            Lookup::Id(id) => find_by_id(self.client.list_buckets().await?, id),
            Lookup::Name(name) => self.client.get_bucket(name).await?,
        })
    }

    async fn lookup(
        &self,
        type_name: &str,
        lookup: &Lookup,
        config: &ResourceState,
    ) -> Result<Option<Value>> {
        match type_name {
            "thecloud_vpc" => observe_opt(self.find_vpc(lookup).await?),
            "thecloud_instance" => observe_opt(self.find_instance(lookup).await?),
            "thecloud_subnet" => {
                observe_opt(self.find_subnet(lookup, config.str_attr("vpc_id")).await?)
            }
            "thecloud_database" => observe_opt(self.find_database(lookup).await?),
            "thecloud_kubernetes_cluster" => observe_opt(self.find_cluster(lookup).await?),
            "thecloud_function" => observe_opt(self.find_function(lookup).await?),
            "thecloud_gateway_route" => observe_opt(self.find_gateway_route(lookup).await?),
            "thecloud_bucket" => observe_opt(self.find_bucket(lookup).await?),
            other => Err(ProviderError::UnknownResourceType(other.to_string())),
        }
    }

    async fn list(&self, type_name: &str, config: &ResourceState) -> Result<Value> {
        match type_name {
            "thecloud_vpcs" => observe_list(self.client.list_vpcs().await?),
            "thecloud_instances" => observe_list(self.client.list_instances().await?),
            "thecloud_subnets" => {
                let vpc_id = config.require_str("vpc_id")?;
                observe_list(self.client.list_subnets(vpc_id).await?)
            }
            "thecloud_databases" => observe_list(self.client.list_databases().await?),
            "thecloud_kubernetes_clusters" => observe_list(self.client.list_clusters().await?),
            "thecloud_functions" => observe_list(self.client.list_functions().await?),
            "thecloud_gateway_routes" => observe_list(self.client.list_gateway_routes().await?),
            "thecloud_buckets" => observe_list(self.client.list_buckets().await?),
            other => Err(ProviderError::UnknownResourceType(other.to_string())),
        }
    }

    /// Read a data source into `config`
    pub async fn read(&self, type_name: &str, mut config: ResourceState) -> Outcome<ResourceState> {
        if let Some((_, key)) = PLURAL.iter().find(|(name, _)| *name == type_name) {
            return match self.list(type_name, &config).await {
                Ok(items) => {
                    config.set_attribute(*key, items);
                    Outcome::ok(config)
                }
                Err(err) => Outcome::error(
                    CLIENT_ERROR,
                    format!("Unable to list {}, got error: {}", key, err),
                ),
            };
        }

        let Some((_, display_name)) = SINGULAR.iter().find(|(name, _)| *name == type_name) else {
            return Outcome::error(
                "Unknown Data Source",
                format!("{} is not a data source of this provider", type_name),
            );
        };

        let lookup = match Lookup::from_state(&config) {
            Ok(lookup) => lookup,
            Err(err) => return Outcome::error("Missing Attribute", err.to_string()),
        };
        debug!("looking up {} by {}", display_name, lookup);

        match self.lookup(type_name, &lookup, &config).await {
            Ok(Some(Value::Object(fields))) => {
                config.attributes.extend(fields);
                Outcome::ok(config)
            }
            Ok(_) => Outcome::error(
                format!("{} Not Found", display_name),
                format!("No {} found with {}", display_name, lookup),
            ),
            Err(err) => Outcome::error(
                CLIENT_ERROR,
                format!("Unable to read {}, got error: {}", display_name, err),
            ),
        }
    }
}

fn observe_list<T: Serialize>(items: Vec<T>) -> Result<Value> {
    items
        .iter()
        .map(observe)
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}
