//! URL helpers for both redirect legs.

use crate::error::BridgeError;
use url::Url;

/// Path segments of the callback endpoint below the service base URL.
const CALLBACK_SEGMENTS: [&str; 2] = ["oauth", "callback"];

/// Parse a client-supplied `redirect_uri`. It must be absolute and able to
/// carry a query string.
pub fn parse_redirect_uri(raw: &str) -> Result<Url, BridgeError> {
    match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(BridgeError::InvalidRedirectUri),
    }
}

/// Build the address the identity backend sends the browser back to. The
/// client's `redirect_uri` and `state` are carried URL-encoded in its query.
pub fn return_address(base_url: &Url, redirect_uri: &str, state: &str) -> Url {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(CALLBACK_SEGMENTS);
    }
    url.query_pairs_mut()
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("state", state);
    url
}

/// Final redirect to the client: its own URI with `code` and `state` appended.
/// Query pairs already present on the URI are kept.
pub fn client_redirect(redirect_uri: &Url, code: &str, state: &str) -> Url {
    let mut url = redirect_uri.clone();
    url.query_pairs_mut()
        .append_pair("code", code)
        .append_pair("state", state);
    url
}
