use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// A `Transport` delivers one form-encoded POST to the API and hands back the raw response body.
///
/// Decoding and envelope checks happen in [`WebClient::call`](crate::WebClient::call), so an
/// implementation only has to move bytes. Timeouts, if any, are the transport's business.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, form), err)]
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String> {
        let mut request = self.client.post(url).form(form).build()?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        // Slack reports errors such as `ratelimited` with a non-2xx status and a regular
        // envelope; those go through to the envelope check.
        if !status.is_success() && serde_json::from_str::<Map<String, Value>>(&body).is_err() {
            return Err(Error::InvalidPayload(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}
