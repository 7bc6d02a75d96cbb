//! POS Client - HTTP client for the restaurant POS API
//!
//! Provides typed calls to the order, bill, catalog and business endpoints,
//! plus the Cloudinary uploader used to store rendered receipts.

pub mod config;
pub mod error;
pub mod http;
pub mod upload;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use upload::{CloudinaryConfig, CloudinaryUploader};

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, UserInfo};
