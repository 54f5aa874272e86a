//! App-only authentication helpers.

use url::form_urlencoded::byte_serialize;

/// Percent-encode a consumer key or secret per RFC 1738 before it is placed in
/// the basic-auth credentials of a token request.
pub fn encode_credential(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// Build the `Authorization` header value for a bearer token.
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}
