//! Bill Model
//!
//! Surcharge configuration, the derived bill view, and the DTOs of the
//! `/api/bill/{id}` endpoints.

use super::order::OrderLine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Candidate line added while modifying a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraDish {
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

impl ExtraDish {
    pub fn new(name: impl Into<String>, quantity: i32, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Synthetic order line (product id 0)
    pub fn to_line(&self) -> OrderLine {
        OrderLine {
            product_id: 0,
            name: Some(self.name.clone()),
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// The four configurable surcharges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeKind {
    VatLow,
    VatHigh,
    ServiceTax,
    ServiceCharge,
}

impl SurchargeKind {
    /// Breakdown order on receipts
    pub const ALL: [SurchargeKind; 4] = [
        SurchargeKind::VatLow,
        SurchargeKind::VatHigh,
        SurchargeKind::ServiceTax,
        SurchargeKind::ServiceCharge,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::VatLow | Self::VatHigh => "VAT",
            Self::ServiceTax => "Service Tax",
            Self::ServiceCharge => "Service Charge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    #[error("{kind:?} rate must be a finite number, got {value}")]
    NotFinite { kind: SurchargeKind, value: f64 },

    #[error("{kind:?} rate must be between 0 and 100, got {value}")]
    OutOfRange { kind: SurchargeKind, value: f64 },
}

/// Surcharge percentages, each in [0, 100]
///
/// Persisted once per installation and applied to every bill.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurchargeRates {
    pub vat_low: f64,
    pub vat_high: f64,
    pub service_tax: f64,
    pub service_charge: f64,
}

impl SurchargeRates {
    pub fn new(
        vat_low: f64,
        vat_high: f64,
        service_tax: f64,
        service_charge: f64,
    ) -> Result<Self, RateError> {
        let rates = Self {
            vat_low,
            vat_high,
            service_tax,
            service_charge,
        };
        rates.validate()?;
        Ok(rates)
    }

    pub fn get(&self, kind: SurchargeKind) -> f64 {
        match kind {
            SurchargeKind::VatLow => self.vat_low,
            SurchargeKind::VatHigh => self.vat_high,
            SurchargeKind::ServiceTax => self.service_tax,
            SurchargeKind::ServiceCharge => self.service_charge,
        }
    }

    pub fn validate(&self) -> Result<(), RateError> {
        for kind in SurchargeKind::ALL {
            let value = self.get(kind);
            if !value.is_finite() {
                return Err(RateError::NotFinite { kind, value });
            }
            if !(0.0..=100.0).contains(&value) {
                return Err(RateError::OutOfRange { kind, value });
            }
        }
        Ok(())
    }
}

/// One included surcharge in a bill breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeLine {
    pub kind: SurchargeKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Derived bill, never persisted directly
///
/// Amounts keep full precision; round only when presenting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillView {
    pub lines: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discounted_subtotal: Decimal,
    /// Only rates above zero appear here
    pub surcharges: Vec<SurchargeLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub grand_total: Decimal,
}

impl BillView {
    pub fn surcharge(&self, kind: SurchargeKind) -> Option<&SurchargeLine> {
        self.surcharges.iter().find(|s| s.kind == kind)
    }
}

/// Line item in the update-items request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLineItem {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<&OrderLine> for BillLineItem {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.display_name().to_string(),
            price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

/// `PUT /api/bill/{id}/update-items` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemsRequest {
    pub items: Vec<BillLineItem>,
}

impl UpdateItemsRequest {
    pub fn from_lines(lines: &[OrderLine]) -> Self {
        Self {
            items: lines.iter().map(BillLineItem::from).collect(),
        }
    }
}

/// `PUT /api/bill/{id}/store-link` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLinkRequest {
    pub bill_store_link: String,
    pub cloudinary_public_id: String,
}

/// `GET /api/bill/{id}` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBill {
    #[serde(default)]
    pub bill_store_link: Option<String>,
}

impl StoredBill {
    /// Stored link, ignoring blank values
    pub fn link(&self) -> Option<&str> {
        self.bill_store_link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// Result of a file-storage upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub public_id: String,
}

/// Locally cached association between an order and its stored receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBillLink {
    pub url: String,
    pub public_id: String,
    /// Unix millis
    pub stored_at: i64,
}
