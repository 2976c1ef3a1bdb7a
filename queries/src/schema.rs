//! Schema types shared across operations: enums, input objects and scalars.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The `ObjectField` custom scalar.
///
/// The server sends either the string `"success"` or an object mapping field
/// names to lists of validation messages; the scalar itself is untyped JSON.
pub type ObjectField = serde_json::Value;

/// Returned when an application name does not match any schema literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application: {0} (expected one of desktop, fenix, reference-browser)")]
pub struct UnknownApplication(pub String);

/// Target application of an experiment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum NimbusExperimentApplication {
    Desktop,
    Fenix,
    ReferenceBrowser,
}

impl NimbusExperimentApplication {
    pub const ALL: [Self; 3] = [Self::Desktop, Self::Fenix, Self::ReferenceBrowser];

    /// The schema enum literal, e.g. `"DESKTOP"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "DESKTOP",
            Self::Fenix => "FENIX",
            Self::ReferenceBrowser => "REFERENCE_BROWSER",
        }
    }
}

impl fmt::Display for NimbusExperimentApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire decoding: only the exact schema literal, as a JSON string.
impl TryFrom<String> for NimbusExperimentApplication {
    type Error = UnknownApplication;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ALL.into_iter().find(|app| app.as_str() == value).ok_or(UnknownApplication(value))
    }
}

/// Accepts the schema literal or its lowercase, hyphenated spelling
/// (`REFERENCE_BROWSER`, `reference-browser`).
impl FromStr for NimbusExperimentApplication {
    type Err = UnknownApplication;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|app| app.as_str() == normalized)
            .ok_or_else(|| UnknownApplication(s.to_owned()))
    }
}

/// Application a feature configuration applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum NimbusFeatureConfigApplication {
    Desktop,
    Fenix,
    ReferenceBrowser,
}

impl NimbusFeatureConfigApplication {
    pub const ALL: [Self; 3] = [Self::Desktop, Self::Fenix, Self::ReferenceBrowser];

    /// The schema enum literal, e.g. `"FENIX"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "DESKTOP",
            Self::Fenix => "FENIX",
            Self::ReferenceBrowser => "REFERENCE_BROWSER",
        }
    }

    /// Whether a feature for this application can be used by an experiment
    /// targeting `app`.
    #[must_use]
    pub fn matches(self, app: NimbusExperimentApplication) -> bool {
        self.as_str() == app.as_str()
    }
}

impl TryFrom<String> for NimbusFeatureConfigApplication {
    type Error = UnknownApplication;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ALL.into_iter().find(|app| app.as_str() == value).ok_or(UnknownApplication(value))
    }
}

impl fmt::Display for NimbusFeatureConfigApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input object for the `createExperiment` mutation.
///
/// `clientMutationId` is optional in the schema and is left out of the
/// variables entirely when unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_mutation_id: Option<String>,
    pub name: String,
    pub hypothesis: String,
    pub application: NimbusExperimentApplication,
}

impl ExperimentInput {
    #[must_use]
    pub fn new(name: impl Into<String>, hypothesis: impl Into<String>, application: NimbusExperimentApplication) -> Self {
        Self { client_mutation_id: None, name: name.into(), hypothesis: hypothesis.into(), application }
    }

    /// Attach a client mutation id that the server echoes back.
    #[must_use]
    pub fn with_client_mutation_id(mut self, id: impl Into<String>) -> Self {
        self.client_mutation_id = Some(id.into());
        self
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
