//! Offline conformance checks for captured response payloads.
//!
//! A payload conforms when it decodes into the operation's `ResponseData`:
//! every selected field present, non-null fields non-null, `__typename`
//! literals and enum values drawn from the schema.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::{CreateExperimentMutation, GetConfigQuery, Operation};

/// Error returned when a payload does not match an operation's shape.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// The payload text is not JSON at all.
    #[error("{operation}: payload is not valid JSON: {source}")]
    InvalidJson { operation: &'static str, source: serde_json::Error },
    /// The payload is a GraphQL envelope whose `data` is absent or `null`.
    #[error("{operation}: envelope carries no data")]
    MissingData { operation: &'static str },
    /// The `data` object does not match the selection set.
    #[error("{operation}: payload does not match the selection set: {source}")]
    Mismatch { operation: &'static str, source: serde_json::Error },
}

impl ShapeError {
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::InvalidJson { operation, .. } | Self::MissingData { operation } | Self::Mismatch { operation, .. } => {
                *operation
            }
        }
    }
}

/// Decode `payload` as operation `O`'s response data.
///
/// Accepts the bare `data` object or a full envelope (`{"data": ...}`).
///
/// # Errors
///
/// Returns [`ShapeError::MissingData`] for an envelope without data and
/// [`ShapeError::Mismatch`] when the data does not fit the selection set.
pub fn check<O: Operation>(payload: &Value) -> Result<O::ResponseData, ShapeError> {
    let data = match payload.get("data") {
        Some(Value::Null) => return Err(ShapeError::MissingData { operation: O::NAME }),
        Some(data) => data,
        None if is_envelope(payload) => return Err(ShapeError::MissingData { operation: O::NAME }),
        None => payload,
    };

    <O::ResponseData as Deserialize>::deserialize(data)
        .map_err(|source| ShapeError::Mismatch { operation: O::NAME, source })
}

/// Parse `text` as JSON and run [`check`] on it.
///
/// # Errors
///
/// Returns [`ShapeError::InvalidJson`] for malformed text, otherwise the
/// errors of [`check`].
pub fn check_str<O: Operation>(text: &str) -> Result<O::ResponseData, ShapeError> {
    let payload: Value =
        serde_json::from_str(text).map_err(|source| ShapeError::InvalidJson { operation: O::NAME, source })?;
    check::<O>(&payload)
}

/// An envelope without `data` still has `errors` or `extensions`.
fn is_envelope(payload: &Value) -> bool {
    payload.get("errors").is_some() || payload.get("extensions").is_some()
}

/// Returned when an operation name is not one of the known operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: {0} (expected getConfig or createExperiment)")]
pub struct UnknownOperation(pub String);

/// Known operations, selectable at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationName {
    GetConfig,
    CreateExperiment,
}

impl OperationName {
    pub const ALL: [Self; 2] = [Self::GetConfig, Self::CreateExperiment];

    /// Wire name, as sent in `operationName`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetConfig => GetConfigQuery::NAME,
            Self::CreateExperiment => CreateExperimentMutation::NAME,
        }
    }

    #[must_use]
    pub fn document(self) -> &'static str {
        match self {
            Self::GetConfig => GetConfigQuery::DOCUMENT,
            Self::CreateExperiment => CreateExperimentMutation::DOCUMENT,
        }
    }

    /// Run [`check`] for this operation, discarding the decoded data.
    ///
    /// # Errors
    ///
    /// Same as [`check`].
    pub fn check(self, payload: &Value) -> Result<(), ShapeError> {
        match self {
            Self::GetConfig => check::<GetConfigQuery>(payload).map(drop),
            Self::CreateExperiment => check::<CreateExperimentMutation>(payload).map(drop),
        }
    }

    /// Run [`check_str`] for this operation, discarding the decoded data.
    ///
    /// # Errors
    ///
    /// Same as [`check_str`].
    pub fn check_str(self, text: &str) -> Result<(), ShapeError> {
        match self {
            Self::GetConfig => check_str::<GetConfigQuery>(text).map(drop),
            Self::CreateExperiment => check_str::<CreateExperimentMutation>(text).map(drop),
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the wire name (`getConfig`) or its kebab-case form (`get-config`).
impl FromStr for OperationName {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "getConfig" | "get-config" => Ok(Self::GetConfig),
            "createExperiment" | "create-experiment" => Ok(Self::CreateExperiment),
            other => Err(UnknownOperation(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[path = "conformance_test.rs"]
mod tests;
