//! Business Profile Model

use serde::{Deserialize, Serialize};

/// Business profile (`GET /api/business/{businessId}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    #[serde(default)]
    pub name: String,
    /// CSS colour, e.g. "#b91c1c"
    #[serde(default)]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
}
