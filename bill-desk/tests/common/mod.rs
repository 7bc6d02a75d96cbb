// bill-desk/tests/common/mod.rs
// In-memory collaborators for workflow tests

#![allow(dead_code)]

use async_trait::async_trait;
use bill_desk::{
    BillDesk, BillPersistence, BillSession, BillingContext, FileStorage, HtmlReceiptRenderer,
    LocalStore,
};
use chrono::TimeZone;
use pos_client::{ClientError, ClientResult};
use shared::{Order, OrderLine, StoredBill, SurchargeRates, UploadedFile};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    UpdateItems { bill_id: u64, lines: Vec<OrderLine> },
    StoreLink { bill_id: u64, link: String, public_id: String },
    StoredBill { bill_id: u64 },
}

#[derive(Default)]
pub struct FakeBillApi {
    pub calls: Mutex<Vec<ApiCall>>,
    pub fail_update: AtomicBool,
    pub fail_store_link: AtomicBool,
    /// Link returned by `GET /api/bill/{id}`
    pub remote_link: Mutex<Option<String>>,
}

impl FakeBillApi {
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_update(&self, on: bool) {
        self.fail_update.store(on, Ordering::SeqCst);
    }

    pub fn fail_store_link(&self, on: bool) {
        self.fail_store_link.store(on, Ordering::SeqCst);
    }
}

fn server_error() -> ClientError {
    ClientError::Server {
        status: 500,
        message: "Internal Server Error".to_string(),
    }
}

#[async_trait]
impl BillPersistence for FakeBillApi {
    async fn update_items(&self, bill_id: u64, lines: &[OrderLine]) -> ClientResult<()> {
        self.calls.lock().unwrap().push(ApiCall::UpdateItems {
            bill_id,
            lines: lines.to_vec(),
        });
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(())
    }

    async fn store_link(&self, bill_id: u64, link: &str, public_id: &str) -> ClientResult<()> {
        self.calls.lock().unwrap().push(ApiCall::StoreLink {
            bill_id,
            link: link.to_string(),
            public_id: public_id.to_string(),
        });
        if self.fail_store_link.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(())
    }

    async fn stored_bill(&self, bill_id: u64) -> ClientResult<StoredBill> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::StoredBill { bill_id });
        match self.remote_link.lock().unwrap().clone() {
            Some(link) => Ok(StoredBill {
                bill_store_link: Some(link),
            }),
            None => Err(ClientError::NotFound("Bill not found".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

#[derive(Default)]
pub struct FakeStorage {
    pub uploads: Mutex<Vec<Upload>>,
    pub fail: AtomicBool,
}

impl FakeStorage {
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn fail(&self, on: bool) {
        self.fail.store(on, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileStorage for FakeStorage {
    async fn upload(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> ClientResult<UploadedFile> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::InvalidResponse("upload rejected".to_string()));
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(Upload {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            body: String::from_utf8_lossy(&data).into_owned(),
        });
        let n = uploads.len();
        Ok(UploadedFile {
            url: format!("https://res.cloudinary.com/demo/raw/upload/v{}/{}", n, file_name),
            public_id: format!("bills/{}-{}", n, file_name),
        })
    }
}

pub struct Harness {
    pub desk: BillDesk,
    pub api: Arc<FakeBillApi>,
    pub storage: Arc<FakeStorage>,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path().join("bill_desk.redb")).unwrap();
        let context = BillingContext::new(store);
        context
            .save_rates(&SurchargeRates::new(5.0, 0.0, 0.0, 10.0).unwrap())
            .unwrap();

        let api = Arc::new(FakeBillApi::default());
        let storage = Arc::new(FakeStorage::default());
        let desk = BillDesk::new(
            context,
            api.clone(),
            storage.clone(),
            Arc::new(HtmlReceiptRenderer::new()),
        );

        Self {
            desk,
            api,
            storage,
            dir,
        }
    }
}

pub fn order(order_id: &str) -> Order {
    Order {
        order_id: order_id.to_string(),
        table_number: "4".to_string(),
        created_at: chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        payment_method: "Cash".to_string(),
        customer_name: "Ravi".to_string(),
        status: "completed".to_string(),
        lines: vec![
            OrderLine::new(1, "Butter Chicken", 2, 100.0),
            OrderLine::new(2, "Jeera Rice", 1, 50.0),
        ],
        discount_amount: None,
        points_used: None,
    }
}

/// Session for ORD-42 with one previewed extra (Paneer Masala 2 x 170)
pub fn session_with_extra() -> BillSession {
    let mut session = BillSession::from_order(order("ORD-42"));
    session
        .editor_mut()
        .add_extra("Paneer Masala", 2, 170.0)
        .unwrap();
    session.editor_mut().set_preview(true);
    session
}
