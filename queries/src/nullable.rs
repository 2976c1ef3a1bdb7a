//! Serde helpers for nullable-but-present fields.

use serde::{Deserialize, Deserializer};

/// Decode a nullable field that must still appear in the payload.
///
/// Serde only applies its implicit `None` default to `Option` fields without
/// a custom deserializer, so routing a field through this function makes a
/// missing key a `missing field` error while `null` still decodes to `None`.
pub(crate) fn required<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}
