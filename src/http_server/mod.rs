//! # HTTP Server Module
//!
//! JSON API over the contacts and users collections.
//!
//! # Endpoints
//!
//! - `GET|POST /contatos`, `GET|PUT|DELETE /contatos/:id`
//! - `GET|POST /usuario`, `GET|PUT|DELETE /usuario/:id`
//!
//! Each handler validates, calls the store, and maps the outcome to
//! 200 / 400 / 404 / 500.

pub mod contact_routes;
pub mod errors;
pub mod response;
pub mod server;
pub mod user_routes;

pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
