use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A read-only bag of properties decoded from an API payload.
///
/// There is no way to mutate a `SlackObject` after it has been built. Looking up a property that
/// is absent, or explicitly `null`, fails with [`Error::MissingField`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SlackObject {
    data: Map<String, Value>,
}

impl SlackObject {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Builds an object out of any JSON value, which must be a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(Error::InvalidPayload(format!("expected a JSON object, got {other}"))),
        }
    }

    /// Decodes a JSON document whose root is an object.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn contains(&self, field: &str) -> bool {
        !matches!(self.data.get(field), None | Some(Value::Null))
    }

    pub fn get(&self, field: &str) -> Result<&Value> {
        match self.data.get(field) {
            None | Some(Value::Null) => Err(Error::MissingField(field.to_owned())),
            Some(value) => Ok(value),
        }
    }

    pub fn str(&self, field: &str) -> Result<&str> {
        self.get(field)?.as_str().ok_or_else(|| unexpected(field, "a string"))
    }

    pub fn bool(&self, field: &str) -> Result<bool> {
        self.get(field)?.as_bool().ok_or_else(|| unexpected(field, "a boolean"))
    }

    pub fn i64(&self, field: &str) -> Result<i64> {
        self.get(field)?.as_i64().ok_or_else(|| unexpected(field, "an integer"))
    }

    pub fn array(&self, field: &str) -> Result<&Vec<Value>> {
        self.get(field)?.as_array().ok_or_else(|| unexpected(field, "an array"))
    }

    /// Returns a nested object as a `SlackObject` of its own.
    pub fn object(&self, field: &str) -> Result<SlackObject> {
        match self.get(field)? {
            Value::Object(data) => Ok(Self { data: data.clone() }),
            _ => Err(unexpected(field, "an object")),
        }
    }

    /// Looks up a nested property by a dotted path such as `"topic.value"`.
    pub fn path(&self, path: &str) -> Result<&Value> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut value = self.data.get(first);
        for segment in segments {
            value = value.and_then(|v| v.get(segment));
        }
        match value {
            None | Some(Value::Null) => Err(Error::MissingField(path.to_owned())),
            Some(value) => Ok(value),
        }
    }

    pub fn path_str(&self, path: &str) -> Result<&str> {
        self.path(path)?.as_str().ok_or_else(|| unexpected(path, "a string"))
    }

    /// Like [`SlackObject::path_str`], but absent properties yield `None`.
    pub fn opt_path_str(&self, path: &str) -> Result<Option<&str>> {
        match self.path_str(path) {
            Err(Error::MissingField(_)) => Ok(None),
            other => other.map(Some),
        }
    }

    /// Like [`SlackObject::str`], but absent properties yield `None`.
    pub fn opt_str(&self, field: &str) -> Result<Option<&str>> {
        if !self.contains(field) {
            return Ok(None);
        }
        self.str(field).map(Some)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.data
    }
}

fn unexpected(field: &str, expected: &'static str) -> Error {
    Error::UnexpectedType { field: field.to_owned(), expected }
}

impl fmt::Display for SlackObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.data) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}
