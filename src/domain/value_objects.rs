use crate::domain::error::ReturnCodeError;
use hyper::body::Bytes;
use percent_encoding::percent_decode_str;
use std::fmt;

/// Represents a validated absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(pub url::Url);

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL
    /// * `Err(ReturnCodeError)` - If the URL is invalid, quoting `url` verbatim
    pub fn new(url: &str) -> Result<Self, ReturnCodeError> {
        url::Url::parse(url)
            .map(Url)
            .map_err(|e| ReturnCodeError::invalid_url(url, e))
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Converts into the URI form used on the wire, dropping credentials and any fragment
    pub fn to_uri(&self) -> Result<http::Uri, http::uri::InvalidUri> {
        let mut url = self.without_credentials();
        url.set_fragment(None);
        url.as_str().parse()
    }

    /// Percent-decoded `(username, password)` when the URL carries either
    pub fn credentials(&self) -> Option<(String, String)> {
        let username = self.0.username();
        let password = self.0.password();
        if username.is_empty() && password.is_none() {
            return None;
        }
        let decode = |raw: &str| percent_decode_str(raw).decode_utf8_lossy().into_owned();
        Some((decode(username), password.map(decode).unwrap_or_default()))
    }

    fn without_credentials(&self) -> url::Url {
        let mut url = self.0.clone();
        // Only fails for URLs that cannot have a host, which cannot carry credentials either.
        let _ = url.set_username("");
        let _ = url.set_password(None);
        url
    }
}

/// Shows the URL with any username and password removed
impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.without_credentials().as_str())
    }
}

/// Request body bytes; empty means no body is sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(pub Bytes);

impl Payload {
    pub fn new(data: Option<&str>) -> Self {
        match data {
            Some(data) if !data.is_empty() => Payload(Bytes::copy_from_slice(data.as_bytes())),
            _ => Payload::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
