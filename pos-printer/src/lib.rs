//! # pos-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - Receipt rows on a fixed column grid (label/amount, items, total, QR)
//! - Windows-1252 encoding (the rupee sign is printed as "Rs.")
//! - Network printing (raw TCP, port 9100 by default)
//!
//! WHAT to print (which rows, in which order) stays in `bill-desk`.
//!
//! ## Example
//!
//! ```ignore
//! use pos_printer::{EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut receipt = EscPosBuilder::new(48);
//! receipt.heading("Spice Route", None);
//! receipt.rule('=');
//! receipt.item_row("Butter Chicken", 2, "100.00", "200.00");
//! receipt.total_row("TOTAL", "200.00");
//!
//! let printer = NetworkPrinter::parse("192.168.1.100")?;
//! printer.print(&receipt.finish()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use escpos::{Align, EscPosBuilder};
pub use printer::{NetworkPrinter, Printer};
