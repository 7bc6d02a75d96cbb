//! Shared types for the bill desk
//!
//! Wire and domain types used across the workspace: orders, catalog
//! entries, bill DTOs, auth DTOs and small utilities.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    BillLineItem, BillView, BusinessProfile, DashboardFilter, ExtraDish, Order, OrderLine,
    Product, StoreLinkRequest, StoredBill, StoredBillLink, SurchargeKind, SurchargeLine,
    SurchargeRates, UpdateItemsRequest, UploadedFile,
};
