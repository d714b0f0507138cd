use crate::domain::entities::{Config, DEFAULT_USER_AGENT, Method};
use crate::domain::error::ReturnCodeError;
use crate::domain::headers::HeaderMultimap;
use crate::domain::value_objects::{Payload, Url};
use anyhow::Result;
use std::str::FromStr;

/// Validates raw command line input into a [`Config`].
///
/// Every step consumes the builder and fails on the first bad value, so later input is never
/// looked at once something is rejected.
pub struct ConfigBuilder {
    url: Option<Url>,
    method: Method,
    headers: HeaderMultimap,
    user_agent: String,
    data: Payload,
    insecure: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            url: None,
            method: Method::default(),
            headers: HeaderMultimap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data: Payload::default(),
            insecure: false,
        }
    }

    /// Accepts the positional arguments, which must be exactly one URL.
    pub fn urls(mut self, args: &[String]) -> Result<Self> {
        let [raw] = args else {
            return Err(ReturnCodeError::argument_count(args.len()).into());
        };
        self.url = Some(Url::new(raw)?);
        Ok(self)
    }

    pub fn method(mut self, method: &str) -> Result<Self> {
        self.method = Method::from_str(method)?;
        Ok(self)
    }

    pub fn headers(mut self, raw_headers: &[String]) -> Result<Self> {
        for raw in raw_headers {
            self.headers.add_raw(raw)?;
        }
        Ok(self)
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn data(mut self, data: Option<&str>) -> Self {
        self.data = Payload::new(data);
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn build(self) -> Result<Config> {
        let url = self
            .url
            .ok_or_else(|| ReturnCodeError::argument_count(0))?;
        Ok(Config {
            headers: self.headers,
            user_agent: self.user_agent,
            data: self.data,
            method: self.method,
            insecure: self.insecure,
            url,
        })
    }
}
