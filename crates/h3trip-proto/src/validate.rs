//! Pre-flight request validation.
//!
//! Runs before any connection is looked up or dialed. [`check`] is a pure
//! predicate; [`validate`] owns the request and releases its body whenever
//! the request is rejected.

use crate::authority::{Authority, SCHEME_HTTPS};
use crate::error::{ProtoError, Result};
use crate::header::{valid_field_name, valid_field_value, valid_method};
use crate::request::Request;

/// Check a request against the baseline wire rules.
///
/// Order: URL present, URL host present, header container present, scheme
/// is `https`, header names and values, method, `Host` override.
pub fn check(req: &Request) -> Result<()> {
    let uri = req.uri.as_ref().ok_or(ProtoError::MissingUrl)?;

    if uri.host().map_or(true, str::is_empty) {
        return Err(ProtoError::MissingHost);
    }

    let headers = req.headers.as_ref().ok_or(ProtoError::MissingHeaders)?;

    let scheme = uri.scheme_str().unwrap_or_default();
    if scheme != SCHEME_HTTPS {
        return Err(ProtoError::UnsupportedScheme(scheme.to_string()));
    }

    for field in headers {
        if !valid_field_name(&field.name) {
            return Err(ProtoError::InvalidHeaderName(
                String::from_utf8_lossy(&field.name).into_owned(),
            ));
        }
        if !valid_field_value(&field.value) {
            return Err(ProtoError::InvalidHeaderValue {
                name: String::from_utf8_lossy(&field.name).into_owned(),
                value: String::from_utf8_lossy(&field.value).into_owned(),
            });
        }
    }

    if !req.method.is_empty() && !valid_method(&req.method) {
        return Err(ProtoError::InvalidMethod(req.method.clone()));
    }

    if let Some(host) = req.host.as_deref().filter(|h| !h.is_empty()) {
        Authority::parse(host)?;
    }

    Ok(())
}

/// Validate `req`, handing it back on success.
///
/// On failure the body is released before the error is returned.
pub fn validate(mut req: Request) -> std::result::Result<Request, ProtoError> {
    match check(&req) {
        Ok(()) => Ok(req),
        Err(e) => {
            req.close_body();
            Err(e)
        }
    }
}
