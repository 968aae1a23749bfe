//! Canonical description of an upstream request.

use reqwest::Url;

/// Query parameter carrying the session token.
pub const TOKEN_PARAM: &str = "rid";

/// HTTP method used for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Parameters go in the query string.
    Get,
    /// Parameters go in a form-encoded body.
    Post,
}

/// Everything needed to (re)send one logical request.
///
/// The engine keeps the caller's descriptor untouched and derives a fresh
/// copy for every attempt, so a token is never attached twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    url: Url,
    params: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            params: Vec::new(),
        }
    }

    pub fn post(url: Url) -> Self {
        Self {
            method: Method::Post,
            url,
            params: Vec::new(),
        }
    }

    /// Add a query (GET) or form (POST) parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Look up a parameter by name.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The session token carried in the URL, if any.
    pub fn token(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == TOKEN_PARAM)
            .map(|(_, v)| v.into_owned())
    }

    /// A copy of this request carrying `token` as its `rid` query parameter.
    ///
    /// Any `rid` already on the URL is replaced.
    pub fn with_token(&self, token: &str) -> Self {
        let mut next = self.clone();
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(k, _)| k != TOKEN_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        next.url
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(TOKEN_PARAM, token);
        next
    }
}
