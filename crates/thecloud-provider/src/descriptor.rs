//! Static metadata that drives the generic reconciler

use crate::error::{ProviderError, Result};
use crate::state::ResourceState;

/// Separator used by association identifiers
pub const ID_SEPARATOR: char = ':';

/// How an external identifier maps onto state attributes on import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKey {
    /// The identifier is the server-issued `id`
    Id,
    /// The identifier is the value of another attribute (e.g., a bucket name)
    Attribute(&'static str),
    /// `parent:child`, stored as `id` and split into the two attributes
    Composite([&'static str; 2]),
}

/// Whether changed attributes can be applied in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSupport {
    /// No update endpoint; updates are reported and skipped
    Unsupported,
    /// The backend applies what the API allows
    InPlace,
}

/// Description of one managed entity
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    /// Host-facing type name (e.g., "thecloud_vpc")
    pub type_name: &'static str,
    /// Name used in diagnostics (e.g., "VPC")
    pub display_name: &'static str,
    /// Attributes copied from API observations into state
    pub attributes: &'static [&'static str],
    /// Attributes the API only returns sometimes
    pub secret_attributes: &'static [&'static str],
    pub import_key: ImportKey,
    pub update: UpdateSupport,
    /// False when the API has no delete endpoint
    pub deletable: bool,
}

impl EntityDescriptor {
    pub const fn new(
        type_name: &'static str,
        display_name: &'static str,
        attributes: &'static [&'static str],
    ) -> Self {
        Self {
            type_name,
            display_name,
            attributes,
            secret_attributes: &[],
            import_key: ImportKey::Id,
            update: UpdateSupport::Unsupported,
            deletable: true,
        }
    }

    pub const fn secrets(mut self, secret_attributes: &'static [&'static str]) -> Self {
        self.secret_attributes = secret_attributes;
        self
    }

    pub const fn import_by(mut self, import_key: ImportKey) -> Self {
        self.import_key = import_key;
        self
    }

    pub const fn updatable(mut self) -> Self {
        self.update = UpdateSupport::InPlace;
        self
    }

    pub const fn undeletable(mut self) -> Self {
        self.deletable = false;
        self
    }

    /// Build the state an import starts from
    pub fn import_state(&self, external_id: &str) -> Result<ResourceState> {
        let state = ResourceState::new(self.type_name);
        match self.import_key {
            ImportKey::Id => Ok(state.with_attribute("id", external_id)),
            ImportKey::Attribute(name) => Ok(state.with_attribute(name, external_id)),
            ImportKey::Composite([parent, child]) => {
                let (parent_id, child_id) = split_composite(external_id).ok_or_else(|| {
                    ProviderError::InvalidImportId {
                        expected: format!("{}{}{}", parent, ID_SEPARATOR, child),
                        got: external_id.to_string(),
                    }
                })?;
                Ok(state
                    .with_attribute("id", external_id)
                    .with_attribute(parent, parent_id)
                    .with_attribute(child, child_id))
            }
        }
    }
}

/// Join association keys into an identifier
pub fn join_composite(parent: &str, child: &str) -> String {
    format!("{}{}{}", parent, ID_SEPARATOR, child)
}

/// Split `parent:child`; both parts must be non-empty
pub fn split_composite(id: &str) -> Option<(&str, &str)> {
    let mut parts = id.split(ID_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(parent), Some(child), None) if !parent.is_empty() && !child.is_empty() => {
            Some((parent, child))
        }
        _ => None,
    }
}

/// Association keys from state, falling back to the composite `id`
pub fn composite_keys<'a>(
    state: &'a ResourceState,
    [parent, child]: [&str; 2],
) -> Result<(&'a str, &'a str)> {
    if let (Some(p), Some(c)) = (state.str_attr(parent), state.str_attr(child)) {
        return Ok((p, c));
    }
    let id = state.require_id()?;
    split_composite(id).ok_or_else(|| ProviderError::InvalidImportId {
        expected: format!("{}{}{}", parent, ID_SEPARATOR, child),
        got: id.to_string(),
    })
}
