//! Typed resource operations
//!
//! Each entity gets a wire type, a typed create request and the
//! create/get/delete/list calls its REST surface offers. Reads return
//! `Ok(None)` when the resource does not exist.

pub mod balancing;
pub mod compute;
pub mod data;
pub mod dns;
pub mod identity;
pub mod network;

pub use balancing::*;
pub use compute::*;
pub use data::*;
pub use dns::*;
pub use identity::*;
pub use network::*;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serializer;

/// Serialize raw bytes as a base64 string
pub(crate) fn as_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}
