//! Integration tests: every rejection path releases the request body
//! exactly once, and accepted requests keep theirs.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use h3trip_proto::validate::validate;
use h3trip_proto::{Authority, Body, HeaderField, ProtoError, Request};
use http::Uri;
use tokio::io::{AsyncRead, ReadBuf};

/// Streaming body that counts how many times it has been released.
struct TrackedBody {
    released: Arc<AtomicUsize>,
}

impl AsyncRead for TrackedBody {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl Drop for TrackedBody {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

fn tracked_request(released: &Arc<AtomicUsize>) -> Request {
    Request::new("POST", Uri::from_static("https://example.test/upload")).body(Body::stream(
        TrackedBody {
            released: Arc::clone(released),
        },
    ))
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Apply `mutate` to a well-formed request, validate it, and check both the
/// error and that the body was released exactly once.
fn assert_rejected(
    label: &str,
    mutate: impl FnOnce(&mut Request),
    expected: impl Fn(&ProtoError) -> bool,
) {
    let released = Arc::new(AtomicUsize::new(0));
    let mut req = tracked_request(&released);
    mutate(&mut req);

    let err = validate(req).expect_err(label);
    assert!(expected(&err), "{label}: unexpected error {err:?}");
    assert!(err.is_malformed_request(), "{label}");
    assert_eq!(released.load(Ordering::SeqCst), 1, "{label}: body released once");
}

#[test]
fn missing_url_releases_body() {
    assert_rejected("missing url", |r| r.uri = None, |e| {
        *e == ProtoError::MissingUrl
    });
}

#[test]
fn missing_host_releases_body() {
    assert_rejected(
        "missing host",
        |r| r.uri = Some(Uri::from_static("/relative")),
        |e| *e == ProtoError::MissingHost,
    );
}

#[test]
fn missing_headers_releases_body() {
    assert_rejected("missing headers", |r| r.headers = None, |e| {
        *e == ProtoError::MissingHeaders
    });
}

#[test]
fn unsupported_scheme_releases_body() {
    assert_rejected(
        "unsupported scheme",
        |r| r.uri = Some(Uri::from_static("http://example.test/")),
        |e| matches!(e, ProtoError::UnsupportedScheme(s) if s == "http"),
    );
}

#[test]
fn invalid_header_name_releases_body() {
    assert_rejected(
        "bad header name",
        |r| {
            r.headers
                .get_or_insert_with(Vec::new)
                .push(HeaderField::new("a b", "v"))
        },
        |e| matches!(e, ProtoError::InvalidHeaderName(_)),
    );
}

#[test]
fn invalid_header_value_releases_body() {
    assert_rejected(
        "bad header value",
        |r| {
            r.headers
                .get_or_insert_with(Vec::new)
                .push(HeaderField::new("x-a", "v\r\n"))
        },
        |e| matches!(e, ProtoError::InvalidHeaderValue { .. }),
    );
}

#[test]
fn invalid_method_releases_body() {
    assert_rejected("bad method", |r| r.method = "GET\t".into(), |e| {
        matches!(e, ProtoError::InvalidMethod(_))
    });
}

#[test]
fn accepted_request_keeps_body() {
    let released = Arc::new(AtomicUsize::new(0));
    let req = validate(tracked_request(&released)).expect("valid request");

    assert_eq!(released.load(Ordering::SeqCst), 0);
    assert_eq!(
        Authority::for_request(&req).to_string(),
        "example.test:443"
    );

    drop(req);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}
