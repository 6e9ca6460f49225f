//! Search backend seam. `ElasticClient` posts the request body to `<url>/<index>/_search`.

use crate::config::ElasticConfig;
use crate::error::{ExtractError, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Executes one search request and returns the raw response body.
pub trait SearchBackend {
    fn search(&self, body: &Value) -> Result<Value>;
}

impl<T: SearchBackend + ?Sized> SearchBackend for &T {
    fn search(&self, body: &Value) -> Result<Value> {
        (**self).search(body)
    }
}

pub struct ElasticClient {
    client: reqwest::blocking::Client,
    search_url: String,
    user: Option<String>,
    password: Option<String>,
}

impl ElasticClient {
    pub fn new(config: &ElasticConfig) -> Result<Self> {
        let base = config.url.trim_end_matches('/');
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            search_url: format!("{}/{}/_search", base, config.index),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

impl SearchBackend for ElasticClient {
    fn search(&self, body: &Value) -> Result<Value> {
        let mut req = self.client.post(&self.search_url).json(body);
        if let Some(user) = &self.user {
            req = req.basic_auth(user, self.password.as_ref());
        }
        let res = req.send()?;
        let status = res.status();
        let text = res.text()?;
        debug!(url = %self.search_url, status = status.as_u16(), bytes = text.len(), "search response");
        if !status.is_success() {
            return Err(ExtractError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}
