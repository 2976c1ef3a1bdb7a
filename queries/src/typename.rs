//! `__typename` discriminants.
//!
//! Each type here is a one-variant enum whose variant name is the GraphQL
//! object type name. It serializes to exactly that string and decodes only
//! from that string; any other JSON value (including serde's `{"Variant":
//! null}` enum form) is rejected.

use serde::{Deserialize, Serialize};

/// A `__typename` that did not match the expected object type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected __typename {expected:?}, found {found:?}")]
pub struct UnexpectedTypename {
    pub expected: &'static str,
    pub found: String,
}

macro_rules! typename {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String")]
        pub enum $name {
            #[default]
            $name,
        }

        impl $name {
            pub const LITERAL: &'static str = stringify!($name);
        }

        impl TryFrom<String> for $name {
            type Error = UnexpectedTypename;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if value == Self::LITERAL {
                    Ok(Self::$name)
                } else {
                    Err(UnexpectedTypename { expected: Self::LITERAL, found: value })
                }
            }
        }
    };
}

typename!(
    /// Discriminant of the `createExperiment` mutation payload.
    CreateExperiment
);

typename!(
    /// Discriminant of an experiment record.
    NimbusExperimentType
);

typename!(
    /// Discriminant of the configuration record returned by `getConfig`.
    NimbusConfigurationType
);

typename!(
    /// Discriminant of a label/value option.
    NimbusLabelValueType
);

typename!(
    /// Discriminant of a feature configuration.
    NimbusFeatureConfigType
);

typename!(
    /// Discriminant of a probe set.
    NimbusProbeSetType
);

#[cfg(test)]
#[path = "typename_test.rs"]
mod tests;
