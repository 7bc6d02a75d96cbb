//! Dashboard filter selection

use serde::{Deserialize, Serialize};

/// Period selected on the sales dashboard, remembered across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardFilter {
    #[default]
    Today,
    Week,
    Month,
    Year,
}

