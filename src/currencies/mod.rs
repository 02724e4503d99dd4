//! Management of the currency reference table.

pub mod domain;
pub mod http;
pub mod services;
