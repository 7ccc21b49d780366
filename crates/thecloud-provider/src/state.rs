//! Resource state exchanged with the host orchestrator
//!
//! The host owns persistence; this module only models one resource's
//! attribute map and the rules for folding API observations into it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ProviderError, Result};

pub type Attributes = Map<String, Value>;

/// State of a single resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type (e.g., "thecloud_vpc")
    pub resource_type: String,

    /// Attribute values keyed by schema name
    pub attributes: Attributes,
}

impl ResourceState {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: Map::new(),
        }
    }

    /// Build a state from a JSON object
    pub fn from_value(resource_type: impl Into<String>, value: Value) -> Result<Self> {
        match value {
            Value::Object(attributes) => Ok(Self {
                resource_type: resource_type.into(),
                attributes,
            }),
            Value::Null => Ok(Self::new(resource_type)),
            other => Err(ProviderError::InvalidAttributes(serde::de::Error::custom(
                format!("expected an object, got {}", other),
            ))),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get an attribute as a specific type
    pub fn get_attribute<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Non-empty string attribute
    pub fn str_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.str_attr(key)
            .ok_or_else(|| ProviderError::MissingAttribute(key.to_string()))
    }

    pub fn id(&self) -> Option<&str> {
        self.str_attr("id")
    }

    pub fn require_id(&self) -> Result<&str> {
        self.require_str("id")
    }

    /// True when the attribute is missing or null
    pub fn is_null(&self, key: &str) -> bool {
        self.attributes.get(key).is_none_or(Value::is_null)
    }

    /// Decode the attribute map into a typed request; nulls count as unset
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let set: Attributes = self
            .attributes
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        serde_json::from_value(Value::Object(set)).map_err(ProviderError::InvalidAttributes)
    }

    /// Fold an API observation into this state.
    ///
    /// Only `fields` are copied. Secret fields keep their current value when
    /// the observation leaves them out or blank. An empty string does not
    /// replace an attribute that is currently unset.
    pub fn merge_observed(&mut self, observed: &Value, fields: &[&str], secrets: &[&str]) {
        let Some(observed) = observed.as_object() else {
            return;
        };

        for &field in fields {
            let Some(value) = observed.get(field) else {
                continue;
            };
            if secrets.contains(&field) && is_blank(value) {
                continue;
            }
            if value.as_str() == Some("") && self.is_null(field) {
                continue;
            }
            self.attributes.insert(field.to_string(), value.clone());
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.attributes)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
