//! Header fields and the RFC 9110 grammar used to vet them.
//!
//! ```text
//! token          = 1*tchar
//! tchar          = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "."
//!                / "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
//! field-value    = *( VCHAR / obs-text / SP / HTAB )
//! ```
//!
//! Fields are kept as raw bytes so that a request can carry headers that
//! break the grammar; [`crate::validate`] rejects those before dispatch.

use http::{HeaderName, HeaderValue, Method};

/// A single header line as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl HeaderField {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.as_bytes())
    }
}

/// Returns true if `name` is a syntactically valid field name (a token).
pub fn valid_field_name(name: &[u8]) -> bool {
    HeaderName::from_bytes(name).is_ok()
}

/// Returns true if `value` is a syntactically valid field value.
///
/// Control characters are rejected except horizontal tab. Bytes >= 0x80
/// (obs-text) are accepted.
pub fn valid_field_value(value: &[u8]) -> bool {
    HeaderValue::from_bytes(value).is_ok()
}

/// Returns true if `method` is a valid request method (an extension
/// method is any token).
pub fn valid_method(method: &str) -> bool {
    Method::from_bytes(method.as_bytes()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_names_accepted() {
        assert!(valid_field_name(b"content-type"));
        assert!(valid_field_name(b"X-Custom_Header.1"));
        assert!(valid_field_name(b"!#$%&'*+-.^_`|~"));
    }

    #[test]
    fn separators_in_name_rejected() {
        assert!(!valid_field_name(b""));
        assert!(!valid_field_name(b"bad name"));
        assert!(!valid_field_name(b"bad:name"));
        assert!(!valid_field_name(b"bad(name)"));
        assert!(!valid_field_name("naïve".as_bytes()));
    }

    #[test]
    fn values_allow_tab_space_and_obs_text() {
        assert!(valid_field_value(b""));
        assert!(valid_field_value(b"text/html; charset=utf-8"));
        assert!(valid_field_value(b"a\tb c"));
        assert!(valid_field_value(&[0x80, 0xff]));
    }

    #[test]
    fn control_characters_in_value_rejected() {
        assert!(!valid_field_value(b"line\r\nbreak"));
        assert!(!valid_field_value(b"nul\0"));
        assert!(!valid_field_value(b"del\x7f"));
        assert!(!valid_field_value(b"\x1b[0m"));
    }

    #[test]
    fn methods_follow_token_grammar() {
        assert!(valid_method("GET"));
        assert!(valid_method("PROPFIND"));
        assert!(valid_method("x-custom"));
        assert!(!valid_method(""));
        assert!(!valid_method("GET /"));
        assert!(!valid_method("PO\nST"));
    }

    #[test]
    fn is_named_ignores_case() {
        let field = HeaderField::new("Content-Length", "3");
        assert!(field.is_named("content-length"));
        assert!(!field.is_named("content-type"));
    }
}
