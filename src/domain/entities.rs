use crate::domain::headers::HeaderMultimap;
use crate::domain::value_objects::{Payload, Url};
use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

/// User agent sent when none is given on the command line
pub const DEFAULT_USER_AGENT: &str = "gurl";

/// HTTP method, any valid token is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method(pub http::Method);

impl Default for Method {
    fn default() -> Self {
        Method(http::Method::GET)
    }
}

impl FromStr for Method {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        http::Method::from_bytes(s.to_uppercase().as_bytes())
            .map(Method)
            .map_err(|_| anyhow!("Unsupported HTTP method: '{}'", s))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Everything needed to perform one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub headers: HeaderMultimap,
    pub user_agent: String,
    pub data: Payload,
    pub method: Method,
    pub insecure: bool,
    pub url: Url,
}

impl Config {
    pub fn new(url: Url) -> Self {
        Self {
            headers: HeaderMultimap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data: Payload::default(),
            method: Method::default(),
            insecure: false,
            url,
        }
    }

    /// Headers in the order they go out: the user agent first, then every user header.
    pub fn outbound_headers(&self) -> HeaderMultimap {
        let mut outbound = HeaderMultimap::new();
        if !self.user_agent.is_empty() {
            outbound.add("User-Agent", self.user_agent.as_str());
        }
        for (name, value) in self.headers.iter() {
            outbound.add(name, value);
        }
        outbound
    }
}
