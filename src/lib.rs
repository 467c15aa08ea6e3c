//! agenda - contacts and users over a document store
//!
//! Request flow: router → schema validation → persistence gateway →
//! JSON response.

pub mod config;
pub mod credentials;
pub mod http_server;
pub mod model;
pub mod schema;
pub mod store;
pub mod telemetry;
