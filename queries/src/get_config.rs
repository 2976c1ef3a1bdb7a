//! `getConfig` query.
//!
//! Returns the option lists the experiment forms are built from. Every list
//! is nullable as a whole and per element; the accessors on [`NimbusConfig`]
//! skip absent entries without changing the stored shape.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use crate::Operation;
use crate::nullable::required;
use crate::schema::NimbusFeatureConfigApplication;
use crate::typename;

pub const OPERATION_NAME: &str = "getConfig";
pub const QUERY: &str = include_str!("../graphql/get_config.graphql");

/// A list whose slots may each be absent, and which may itself be absent.
pub type NullableList<T> = Option<Vec<Option<T>>>;

/// Marker type binding the query to [`GraphQLQuery`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GetConfigQuery;

impl GraphQLQuery for GetConfigQuery {
    type Variables = Variables;
    type ResponseData = ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody { variables, query: QUERY, operation_name: OPERATION_NAME }
    }
}

impl Operation for GetConfigQuery {
    const NAME: &'static str = OPERATION_NAME;
    const DOCUMENT: &'static str = QUERY;
}

/// The query takes no variables; serializes as `{}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {}

/// `data` of a `getConfig` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    #[serde(deserialize_with = "required")]
    pub nimbus_config: Option<NimbusConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NimbusConfig {
    #[serde(rename = "__typename")]
    pub typename: typename::NimbusConfigurationType,
    #[serde(deserialize_with = "required")]
    pub application: NullableList<LabelValue>,
    #[serde(deserialize_with = "required")]
    pub channel: NullableList<LabelValue>,
    #[serde(deserialize_with = "required")]
    pub feature_config: NullableList<FeatureConfig>,
    #[serde(deserialize_with = "required")]
    pub firefox_min_version: NullableList<LabelValue>,
    #[serde(deserialize_with = "required")]
    pub probe_sets: NullableList<ProbeSet>,
    #[serde(deserialize_with = "required")]
    pub targeting_config_slug: NullableList<LabelValue>,
    #[serde(deserialize_with = "required")]
    pub hypothesis_default: Option<String>,
    #[serde(deserialize_with = "required")]
    pub documentation_link: NullableList<LabelValue>,
}

/// A `(label, value)` option shared by every enumerated list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValue {
    #[serde(rename = "__typename")]
    pub typename: typename::NimbusLabelValueType,
    #[serde(deserialize_with = "required")]
    pub label: Option<String>,
    #[serde(deserialize_with = "required")]
    pub value: Option<String>,
}

impl LabelValue {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            typename: typename::NimbusLabelValueType::default(),
            label: Some(label.into()),
            value: Some(value.into()),
        }
    }

    /// Both halves, if both are present.
    #[must_use]
    pub fn pair(&self) -> Option<(&str, &str)> {
        Some((self.label.as_deref()?, self.value.as_deref()?))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    #[serde(rename = "__typename")]
    pub typename: typename::NimbusFeatureConfigType,
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(deserialize_with = "required")]
    pub description: Option<String>,
    #[serde(deserialize_with = "required")]
    pub application: Option<NimbusFeatureConfigApplication>,
    #[serde(deserialize_with = "required")]
    pub owner_email: Option<String>,
    /// JSON schema of the feature's value, serialized as text.
    #[serde(deserialize_with = "required")]
    pub schema: Option<String>,
}

impl FeatureConfig {
    /// Parse [`FeatureConfig::schema`] into JSON.
    ///
    /// Returns `None` when no schema is attached.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the schema text is not valid JSON.
    pub fn parsed_schema(&self) -> Option<Result<serde_json::Value, serde_json::Error>> {
        self.schema.as_deref().map(serde_json::from_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSet {
    #[serde(rename = "__typename")]
    pub typename: typename::NimbusProbeSetType,
    pub name: String,
    pub slug: String,
}

fn present<T>(list: &NullableList<T>) -> impl Iterator<Item = &T> {
    list.iter().flatten().flatten()
}

impl NimbusConfig {
    pub fn applications(&self) -> impl Iterator<Item = &LabelValue> {
        present(&self.application)
    }

    pub fn channels(&self) -> impl Iterator<Item = &LabelValue> {
        present(&self.channel)
    }

    pub fn firefox_min_versions(&self) -> impl Iterator<Item = &LabelValue> {
        present(&self.firefox_min_version)
    }

    pub fn targeting_configs(&self) -> impl Iterator<Item = &LabelValue> {
        present(&self.targeting_config_slug)
    }

    pub fn documentation_links(&self) -> impl Iterator<Item = &LabelValue> {
        present(&self.documentation_link)
    }

    pub fn feature_configs(&self) -> impl Iterator<Item = &FeatureConfig> {
        present(&self.feature_config)
    }

    pub fn probe_sets(&self) -> impl Iterator<Item = &ProbeSet> {
        present(&self.probe_sets)
    }

    #[must_use]
    pub fn feature_config_by_slug(&self, slug: &str) -> Option<&FeatureConfig> {
        self.feature_configs().find(|feature| feature.slug == slug)
    }
}

/// Find the label paired with `value` in a list of options.
pub fn label_for<'a>(mut options: impl Iterator<Item = &'a LabelValue>, value: &str) -> Option<&'a str> {
    options.find_map(|option| match option.pair() {
        Some((label, v)) if v == value => Some(label),
        _ => None,
    })
}

#[cfg(test)]
#[path = "get_config_test.rs"]
mod tests;
