//! Proxying and reshaping of the external currency-rate feed.

pub mod client;
pub mod http;
pub mod services;
pub mod snapshot;
pub mod transform;
