//! # bill-desk
//!
//! Bill computation and finalization for a restaurant POS.
//!
//! - [`money`]: bill derivation from an order and surcharge rates
//! - [`editor`]: extra dishes added before a bill is finalized
//! - [`workflow`]: commit (update items, render, upload, record link) and share
//! - [`context`]: installation-wide state backed by a local redb store
//!
//! ## Example
//!
//! ```ignore
//! let config = Config::load();
//! logger::init_logger_with_file(&config.log_level, config.log_json, Some(&config.log_dir()))?;
//!
//! let (desk, api) = BillDesk::from_config(&config)?;
//! let mut session = BillSession::load(api.as_ref(), "ORD-42").await?;
//! session.editor_mut().add_extra("Paneer Masala", 2, 170.0)?;
//! session.editor_mut().set_preview(true);
//!
//! let intent = desk.share(&mut session, "98765-43210").await?;
//! println!("{}", intent.url);
//! ```

pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod logger;
pub mod money;
pub mod receipt;
pub mod service;
pub mod session;
pub mod share;
pub mod store;
pub mod workflow;

// Re-exports
pub use config::Config;
pub use context::BillingContext;
pub use editor::{DishDraft, EditorState, ExtraDishEditor};
pub use error::{BillingError, BillingResult, CommitStep, ErrorCategory};
pub use money::compute_bill;
pub use receipt::{
    EscPosReceiptRenderer, HtmlReceiptRenderer, ReceiptArtifact, ReceiptDocument,
    ReceiptRenderer, print_receipt,
};
pub use service::{BillPersistence, FileStorage, MenuCatalog, OrderSource};
pub use session::BillSession;
pub use share::{ShareIntent, compose_share, normalize_phone};
pub use store::{LocalStore, StoreError, StoreResult};
pub use workflow::{BillDesk, CommitOutcome};
