//! `aitable` crate: a workflow node for the Aitable fusion API.
//!
//! The node maps a (resource, operation) selection plus per-item parameters
//! onto one HTTP request per input item, sends it through the host's
//! [`nodes::HttpHelper`] and normalizes the answer into the host item model.

pub mod config;
pub mod error;
pub mod node;
pub mod options;
pub mod params;
pub mod request;
pub mod resource;
pub mod response;

pub use config::AitableConfig;
pub use error::AitableError;
pub use node::{AitableNode, CREDENTIAL_NAME};
pub use options::{load_field_options, FieldOption};
pub use request::{resolve, Endpoint, RequestBuilder, RequestSpec};
pub use resource::{NodeVersion, Operation, Resource};
