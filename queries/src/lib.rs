//! Typed contract for the Nimbus UI's GraphQL operations.
//!
//! DESIGN
//! ======
//! Each operation module mirrors one selection set field-for-field. Nullable
//! schema fields are `Option<T>` but still mandatory on the wire: a payload
//! that omits a selected field fails to decode instead of defaulting to
//! `None`. Lists keep both nullability levels (`Option<Vec<Option<T>>>`).
//! Every object carries its `__typename` as a single-literal enum, so a
//! payload with the wrong discriminant is rejected at decode time.

pub mod conformance;
pub mod create_experiment;
pub mod get_config;
mod nullable;
pub mod schema;
pub mod typename;

pub use graphql_client::{GraphQLQuery, QueryBody, Response};

pub use conformance::{OperationName, ShapeError};
pub use create_experiment::CreateExperimentMutation;
pub use get_config::GetConfigQuery;
pub use schema::{ExperimentInput, NimbusExperimentApplication, NimbusFeatureConfigApplication, ObjectField};

/// A GraphQL operation with a known wire name.
///
/// `graphql_client::GraphQLQuery` only exposes the name through a built
/// request body; this adds it as a constant so it can be used before any
/// variables exist (logging, conformance errors).
pub trait Operation: GraphQLQuery {
    /// Operation name as it appears in the document and in `operationName`.
    const NAME: &'static str;

    /// The full GraphQL document sent to the endpoint.
    const DOCUMENT: &'static str;
}
