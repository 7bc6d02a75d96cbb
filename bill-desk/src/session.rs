//! Bill session
//!
//! State of one bill screen: the order being billed, its extra-dish editor
//! and the catalog to pick extras from.

use crate::editor::ExtraDishEditor;
use crate::error::{BillingError, BillingResult};
use crate::money::compute_bill;
use crate::receipt::ReceiptDocument;
use crate::service::{MenuCatalog, OrderSource};
use pos_client::ClientError;
use shared::util::numeric_order_id;
use shared::{BillView, BusinessProfile, Order, OrderLine, Product, SurchargeRates};
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct BillSession {
    order: Order,
    editor: ExtraDishEditor,
    products: Vec<Product>,
    business: BusinessProfile,
}

impl BillSession {
    /// Session for an order handed over by the previous screen
    pub fn from_order(order: Order) -> Self {
        Self {
            order,
            editor: ExtraDishEditor::new(),
            products: Vec::new(),
            business: BusinessProfile::default(),
        }
    }

    /// Fetch the order by id
    #[instrument(skip(source))]
    pub async fn load(source: &dyn OrderSource, order_id: &str) -> BillingResult<Self> {
        let order = source.fetch_order(order_id).await.map_err(|e| match e {
            ClientError::NotFound(_) => BillingError::NotFound(order_id.to_string()),
            other => other.into(),
        })?;
        tracing::debug!(lines = order.lines.len(), "Order loaded");
        Ok(Self::from_order(order))
    }

    /// Load the dishes extras can be chosen from, and the business profile
    #[instrument(skip(self, catalog), fields(order_id = %self.order.order_id))]
    pub async fn load_catalog(
        &mut self,
        catalog: &dyn MenuCatalog,
        business_id: &str,
    ) -> BillingResult<()> {
        self.products = catalog.products(business_id).await?;
        self.business = catalog.business(business_id).await?;
        tracing::debug!(products = self.products.len(), "Catalog loaded");
        Ok(())
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn business(&self) -> &BusinessProfile {
        &self.business
    }

    pub fn editor(&self) -> &ExtraDishEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ExtraDishEditor {
        &mut self.editor
    }

    /// Bill as currently shown (extras included only while previewing)
    pub fn bill(&self, rates: &SurchargeRates) -> BillView {
        compute_bill(
            &self.order,
            rates,
            self.editor.extras(),
            self.editor.is_preview(),
        )
    }

    /// Id used by the bill endpoints ("ORD-42" -> 42)
    pub fn numeric_id(&self) -> BillingResult<u64> {
        numeric_order_id(&self.order.order_id)
            .ok_or_else(|| BillingError::InvalidOrderId(self.order.order_id.clone()))
    }

    /// Everything a renderer needs for the current view
    pub fn receipt_document(&self, rates: &SurchargeRates, link: Option<&str>) -> ReceiptDocument {
        ReceiptDocument {
            order: self.order.clone(),
            bill: self.bill(rates),
            business: self.business.clone(),
            link: link.map(str::to_string),
        }
    }

    /// Adopt the committed line set and reset the editor
    pub(crate) fn complete_commit(&mut self, committed_lines: Option<Vec<OrderLine>>) {
        if let Some(lines) = committed_lines {
            self.order.lines = lines;
        }
        self.editor.finish_commit();
    }
}
