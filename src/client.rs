use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::{
    channel::{Channel, ChannelMethods},
    config::ClientConfig,
    error::{Result, SlackError},
    methods::Arg,
    object::SlackObject,
    transport::{HttpTransport, Transport},
    user::{User, UserMethods},
};

/// Entry point to the Slack Web API.
///
/// Every call is a form-encoded POST to `{base_url}/{method}` carrying the API token. Responses
/// are decoded into [`SlackObject`]s once their `ok` flag has been checked.
///
/// Cloning a `WebClient` is cheap; clones share the same transport and settings.
#[derive(Clone)]
pub struct WebClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Box<dyn Transport>,
    token: String,
    base_url: String,
    member_concurrency: usize,
}

impl WebClient {
    /// Creates a client for `token` with default settings.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(token))
    }

    /// Creates a client talking HTTP with the given settings.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let transport = match config.timeout_secs {
            Some(secs) => HttpTransport::with_timeout(Duration::from_secs(secs))?,
            None => HttpTransport::default(),
        };
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client that sends its requests through `transport`.
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        let ClientConfig { token, base_url, member_concurrency, .. } = config;
        Self {
            inner: Arc::new(ClientInner {
                transport: Box::new(transport),
                token,
                base_url: base_url.trim_end_matches('/').to_owned(),
                member_concurrency,
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// How many member lookups [`Channel::members`] keeps in flight.
    pub fn member_concurrency(&self) -> usize {
        self.inner.member_concurrency
    }

    /// Calls an API method and returns the decoded response envelope.
    ///
    /// Fails with [`Error::Api`](crate::Error::Api) when Slack answers with `ok: false`.
    #[tracing::instrument(skip(self, args), err)]
    pub async fn call(&self, method: &str, args: &[(&str, Arg)]) -> Result<SlackObject> {
        let mut form = args
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.as_str().to_owned()))
            .collect::<Vec<_>>();
        form.push(("token".to_owned(), self.inner.token.clone()));

        let url = format!("{}/{}", self.inner.base_url, method);
        let body = self.inner.transport.post_form(&url, &form).await?;
        let envelope = SlackObject::from_json(&body)?;

        if envelope.as_map().get("ok") != Some(&Value::Bool(true)) {
            let code = envelope.opt_str("error").ok().flatten().unwrap_or(SlackError::UNKNOWN);
            tracing::debug!(method, code, "call rejected");
            return Err(SlackError::new(code).into());
        }
        Ok(envelope)
    }

    pub fn channels(&self) -> ChannelMethods {
        ChannelMethods::new(self.clone())
    }

    pub fn users(&self) -> UserMethods {
        UserMethods::new(self.clone())
    }

    /// Shorthand for `channels().info(id)`.
    pub async fn get_channel(&self, id: &str) -> Result<Channel> {
        self.channels().info(id).await
    }

    /// Shorthand for `users().info(id)`.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.users().info(id).await
    }
}

impl fmt::Debug for WebClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebClient")
            .field("base_url", &self.inner.base_url)
            .field("member_concurrency", &self.inner.member_concurrency)
            .finish_non_exhaustive()
    }
}
