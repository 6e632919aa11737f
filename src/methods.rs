use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    client::WebClient,
    error::{Error, Result},
    object::SlackObject,
};

/// A typed object of the Slack API, such as a channel or a user.
///
/// The constants describe how the API refers to the type: the method prefix (`channels`), the
/// payload key of a single object (`channel`) and of a collection (`channels`).
pub trait ApiObject: Sized {
    const API_PREFIX: &'static str;
    const API_NAME: &'static str;
    const API_NAME_PLURAL: &'static str;

    fn from_object(client: &WebClient, object: SlackObject) -> Result<Self>;
}

/// A single form argument, already serialised the way the API expects it.
///
/// Typed objects are sent as their ID and timestamps as unix seconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arg(String);

impl Arg {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg(value.to_owned())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg(value.clone())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg(value.to_string())
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg(value.to_string())
    }
}

impl From<DateTime<Utc>> for Arg {
    fn from(value: DateTime<Utc>) -> Self {
        Arg(value.timestamp().to_string())
    }
}

/// Shared plumbing for the method groups of one object type.
pub(crate) struct Methods<T> {
    client: WebClient,
    object_type: PhantomData<fn() -> T>,
}

impl<T> Clone for Methods<T> {
    fn clone(&self) -> Self {
        Self { client: self.client.clone(), object_type: PhantomData }
    }
}

impl<T: ApiObject> Methods<T> {
    pub fn new(client: WebClient) -> Self {
        Self { client, object_type: PhantomData }
    }

    pub fn client(&self) -> &WebClient {
        &self.client
    }

    /// Calls `{prefix}.{method}`, passing `target` under the type's singular name.
    pub async fn call(
        &self,
        method: &str,
        target: Option<Arg>,
        args: &[(&str, Arg)],
    ) -> Result<SlackObject> {
        let mut form = Vec::with_capacity(args.len() + 1);
        if let Some(target) = target {
            form.push((T::API_NAME, target));
        }
        form.extend(args.iter().cloned());
        self.client.call(&format!("{}.{}", T::API_PREFIX, method), &form).await
    }

    /// Calls a method whose payload holds one object under the type's singular name.
    pub async fn call_for_object(&self, method: &str, args: &[(&str, Arg)]) -> Result<T> {
        let response = self.call(method, None, args).await?;
        T::from_object(&self.client, response.object(T::API_NAME)?)
    }

    /// Calls a method whose payload holds an array of objects under the type's plural name.
    pub async fn call_for_collection(&self, method: &str, args: &[(&str, Arg)]) -> Result<Vec<T>> {
        let response = self.call(method, None, args).await?;
        response
            .array(T::API_NAME_PLURAL)?
            .iter()
            .map(|raw| T::from_object(&self.client, SlackObject::from_value(raw.clone())?))
            .collect()
    }
}

/// Reads a Slack timestamp, which is either a number of seconds or a string like
/// `"1401383885.000061"`.
pub(crate) fn parse_timestamp(field: &str, value: &Value) -> Result<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_f64().map(|f| f as i64),
        Value::String(s) => s.split('.').next().and_then(|whole| whole.parse::<i64>().ok()),
        _ => None,
    };
    secs.and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| Error::UnexpectedType { field: field.to_owned(), expected: "a timestamp" })
}
