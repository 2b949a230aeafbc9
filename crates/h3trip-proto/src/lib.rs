//! h3trip request-level protocol rules.
//!
//! Shared layer used by `h3trip-client-core` and by per-connection HTTP/3
//! engines plugged into it:
//!
//! - Request / response value types
//! - RFC 9110 token and field-value grammar
//! - Pre-flight request validation (no I/O)
//! - Authority (connection cache key) derivation
//! - HTTP/3 SETTINGS identifiers and the reserved-setting rules

pub mod authority;
pub mod error;
pub mod frame;
pub mod header;
pub mod request;
pub mod response;
pub mod settings;
pub mod validate;

pub use authority::Authority;
pub use error::ProtoError;
pub use header::HeaderField;
pub use request::{Body, Request};
pub use response::Response;
pub use settings::Settings;
