//! Wire-format helpers shared by the model modules.

use serde::{Deserialize, Deserializer};

/// Skip predicate for optional lists: absent and empty both vanish from the
/// wire.
pub(crate) fn is_none_or_empty<T>(value: &Option<Vec<T>>) -> bool {
    value.as_ref().map_or(true, Vec::is_empty)
}

/// Decodes a field that legacy producers emit either as a bare object or as
/// an array, normalizing to a list. Encoding always uses the array form.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::Many(list) => list,
        OneOrMany::One(item) => vec![item],
    }))
}
