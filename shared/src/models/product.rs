//! Product Model

use serde::{Deserialize, Deserializer, Serialize};

/// Menu catalog entry (`GET /api/products?businessId=...`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "id_from_any")]
    pub id: i64,
    pub name: String,
    /// Price in currency unit
    pub price: f64,
}

/// Catalog ids arrive either as numbers or numeric strings.
fn id_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
