//! Bill desk error types
//!
//! Every error is recoverable at the screen level; [`ErrorCategory`] tells
//! the caller how to surface it:
//!
//! - `Validation`: transient notice, nothing changed
//! - `Auth`: credential missing or rejected, go to login
//! - `Remote`: API or storage call failed, the operation stopped at that step
//! - `NotFound`: the order does not exist, go back to the listing
//! - `Storage` / `Render` / `Device` / `System`: local failures

use crate::store::StoreError;
use pos_client::ClientError;
use pos_printer::PrintError;
use serde::{Deserialize, Serialize};
use shared::models::RateError;
use std::fmt;
use thiserror::Error;

/// Error category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Auth,
    Remote,
    NotFound,
    Storage,
    Render,
    Device,
    System,
}

/// Steps of the commit workflow that talk to collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    UpdateItems,
    Upload,
    StoreLink,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UpdateItems => "Updating bill items",
            Self::Upload => "Uploading receipt",
            Self::StoreLink => "Saving receipt link",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Please select a dish")]
    EmptyDishName,

    #[error("Quantity must be greater than zero, got {0}")]
    InvalidQuantity(i32),

    #[error("Price must be a non-negative number, got {0}")]
    InvalidPrice(f64),

    #[error("No dish is being composed")]
    NoDishSelected,

    #[error("Extra dish index {index} out of range ({len} extras)")]
    ExtraIndexOutOfRange { index: usize, len: usize },

    #[error("Phone number must have exactly 10 digits, got {0}")]
    InvalidPhone(usize),

    #[error("No stored bill link to share")]
    MissingShareLink,

    #[error("Order id '{0}' has no numeric part")]
    InvalidOrderId(String),

    #[error("Invalid surcharge rates: {0}")]
    InvalidRates(#[from] RateError),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("{step} failed: {source}")]
    Commit {
        step: CommitStep,
        #[source]
        source: ClientError,
    },

    #[error("Request failed: {0}")]
    Remote(ClientError),

    #[error("Receipt rendering failed: {0}")]
    Render(String),

    #[error("Print failed: {0}")]
    Print(#[from] PrintError),

    #[error("Local store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid config: {0}")]
    Config(String),
}

impl BillingError {
    pub fn commit(step: CommitStep, source: ClientError) -> Self {
        Self::Commit { step, source }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyDishName
            | Self::InvalidQuantity(_)
            | Self::InvalidPrice(_)
            | Self::NoDishSelected
            | Self::ExtraIndexOutOfRange { .. }
            | Self::InvalidPhone(_)
            | Self::MissingShareLink
            | Self::InvalidOrderId(_)
            | Self::InvalidRates(_) => ErrorCategory::Validation,
            Self::NotAuthenticated => ErrorCategory::Auth,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Commit { source, .. } if source.is_unauthorized() => ErrorCategory::Auth,
            Self::Commit { .. } | Self::Remote(_) => ErrorCategory::Remote,
            Self::Render(_) => ErrorCategory::Render,
            Self::Print(_) => ErrorCategory::Device,
            Self::Store(_) => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::System,
        }
    }

    /// The failed commit step, if any
    pub fn commit_step(&self) -> Option<CommitStep> {
        match self {
            Self::Commit { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<ClientError> for BillingError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized => Self::NotAuthenticated,
            ClientError::NotFound(resource) => Self::NotFound(resource),
            other => Self::Remote(other),
        }
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
