//! Collaborator seams
//!
//! The bill desk talks to the outside world only through these traits.
//! Network implementations are provided for [`HttpClient`] (POS API) and
//! [`CloudinaryUploader`] (file storage); tests plug in fakes.

use async_trait::async_trait;
use pos_client::{ClientResult, CloudinaryUploader, HttpClient};
use shared::{BusinessProfile, Order, OrderLine, Product, StoredBill, UploadedFile};

/// Fetches orders by id
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_order(&self, order_id: &str) -> ClientResult<Order>;
}

/// Menu and business profile
#[async_trait]
pub trait MenuCatalog: Send + Sync {
    async fn products(&self, business_id: &str) -> ClientResult<Vec<Product>>;
    async fn business(&self, business_id: &str) -> ClientResult<BusinessProfile>;
}

/// Remote bill records, keyed by the numeric order id
#[async_trait]
pub trait BillPersistence: Send + Sync {
    /// Replace the order's line items wholesale
    async fn update_items(&self, bill_id: u64, lines: &[OrderLine]) -> ClientResult<()>;
    async fn store_link(&self, bill_id: u64, link: &str, public_id: &str) -> ClientResult<()>;
    async fn stored_bill(&self, bill_id: u64) -> ClientResult<StoredBill>;
}

/// Cloud file storage for rendered receipts
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> ClientResult<UploadedFile>;
}

#[async_trait]
impl OrderSource for HttpClient {
    async fn fetch_order(&self, order_id: &str) -> ClientResult<Order> {
        HttpClient::fetch_order(self, order_id).await
    }
}

#[async_trait]
impl MenuCatalog for HttpClient {
    async fn products(&self, business_id: &str) -> ClientResult<Vec<Product>> {
        self.fetch_products(business_id).await
    }

    async fn business(&self, business_id: &str) -> ClientResult<BusinessProfile> {
        self.fetch_business(business_id).await
    }
}

#[async_trait]
impl BillPersistence for HttpClient {
    async fn update_items(&self, bill_id: u64, lines: &[OrderLine]) -> ClientResult<()> {
        self.update_bill_items(bill_id, lines).await
    }

    async fn store_link(&self, bill_id: u64, link: &str, public_id: &str) -> ClientResult<()> {
        self.store_bill_link(bill_id, link, public_id).await
    }

    async fn stored_bill(&self, bill_id: u64) -> ClientResult<StoredBill> {
        self.fetch_stored_bill(bill_id).await
    }
}

#[async_trait]
impl FileStorage for CloudinaryUploader {
    async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> ClientResult<UploadedFile> {
        CloudinaryUploader::upload(self, data, file_name, content_type).await
    }
}
