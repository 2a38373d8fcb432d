pub mod brasilapi;
pub mod viacep;

use serde::{Deserialize, Deserializer};

/// Providers send `null` for fields they don't know (e.g. street on a city-wide CEP).
pub(crate) fn null_as_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}
