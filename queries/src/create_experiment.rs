//! `createExperiment` mutation.
//!
//! Selection: `createExperiment { message status nimbusExperiment { name slug
//! hypothesis application } }`.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Operation;
use crate::nullable::required;
use crate::schema::{ExperimentInput, NimbusExperimentApplication, ObjectField};
use crate::typename;

pub const OPERATION_NAME: &str = "createExperiment";
pub const QUERY: &str = include_str!("../graphql/create_experiment.graphql");

/// Marker type binding the mutation to [`GraphQLQuery`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CreateExperimentMutation;

impl GraphQLQuery for CreateExperimentMutation {
    type Variables = Variables;
    type ResponseData = ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody { variables, query: QUERY, operation_name: OPERATION_NAME }
    }
}

impl Operation for CreateExperimentMutation {
    const NAME: &'static str = OPERATION_NAME;
    const DOCUMENT: &'static str = QUERY;
}

/// Variables of the mutation: a single required `input`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    pub input: ExperimentInput,
}

/// `data` of a `createExperiment` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    #[serde(deserialize_with = "required")]
    pub create_experiment: Option<CreateExperiment>,
}

/// Mutation payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperiment {
    #[serde(rename = "__typename")]
    pub typename: typename::CreateExperiment,
    #[serde(deserialize_with = "required")]
    pub message: Option<ObjectField>,
    #[serde(deserialize_with = "required")]
    pub status: Option<i32>,
    #[serde(deserialize_with = "required")]
    pub nimbus_experiment: Option<NimbusExperiment>,
}

/// The experiment created by the mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NimbusExperiment {
    #[serde(rename = "__typename")]
    pub typename: typename::NimbusExperimentType,
    pub name: String,
    pub slug: String,
    pub hypothesis: String,
    #[serde(deserialize_with = "required")]
    pub application: Option<NimbusExperimentApplication>,
}

/// How a mutation payload should be read by a caller.
#[derive(Clone, Debug, PartialEq)]
pub enum CreationOutcome<'a> {
    /// The server returned the new experiment.
    Created(&'a NimbusExperiment),
    /// No experiment came back; `status` and `message` explain why.
    Rejected { status: Option<i32>, message: Option<&'a ObjectField> },
}

impl CreateExperiment {
    #[must_use]
    pub fn outcome(&self) -> CreationOutcome<'_> {
        match &self.nimbus_experiment {
            Some(experiment) => CreationOutcome::Created(experiment),
            None => CreationOutcome::Rejected { status: self.status, message: self.message.as_ref() },
        }
    }

    /// `message` when it is a plain string (`"success"` on creation).
    #[must_use]
    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().and_then(Value::as_str)
    }

    /// Per-field validation messages from an object-form `message`.
    ///
    /// A field whose value is a bare string yields a single message;
    /// non-string list entries are rendered as JSON.
    #[must_use]
    pub fn field_errors(&self) -> Vec<(String, Vec<String>)> {
        let Some(Value::Object(fields)) = &self.message else {
            return Vec::new();
        };

        fields
            .iter()
            .map(|(field, messages)| {
                let messages = match messages {
                    Value::Array(items) => items
                        .iter()
                        .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_owned))
                        .collect(),
                    Value::String(text) => vec![text.clone()],
                    other => vec![other.to_string()],
                };
                (field.clone(), messages)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "create_experiment_test.rs"]
mod tests;
