//! `nodes` crate: the host contract every workflow node is written against.
//!
//! A node implements [`ExecutableNode`] and receives the incoming item list
//! together with an [`ExecutionContext`] carrying its parameters, credentials
//! and the host's continue-on-fail flag.  Outbound HTTP goes through the
//! injected [`HttpHelper`] so nodes never own a client themselves.

pub mod error;
pub mod http;
pub mod item;
pub mod mock;
pub mod parameters;
pub mod traits;

pub use error::NodeError;
pub use http::{HttpError, HttpHelper, HttpHelperConfig, HttpMethod, HttpRequestOptions, ReqwestHelper};
pub use item::NodeItem;
pub use parameters::NodeParameters;
pub use traits::{ExecutableNode, ExecutionContext};
