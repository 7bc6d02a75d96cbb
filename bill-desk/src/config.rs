use crate::error::BillingResult;
use crate::receipt::EscPosReceiptRenderer;
use pos_printer::NetworkPrinter;
use std::path::PathBuf;

/// Bill desk configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./work_dir | Local store and logs |
/// | API_BASE_URL | http://localhost:5000 | POS REST API |
/// | BUSINESS_ID | - | Business whose catalog is loaded |
/// | AUTH_TOKEN | - | Bearer token (otherwise the stored credential is used) |
/// | REQUEST_TIMEOUT_SECS | 30 | HTTP timeout |
/// | CLOUDINARY_CLOUD_NAME | - | File storage account |
/// | CLOUDINARY_UPLOAD_PRESET | - | Unsigned upload preset |
/// | CLOUDINARY_FOLDER | - | Upload folder |
/// | WHATSAPP_COUNTRY_CODE | 91 | Prefix for share links |
/// | RECEIPT_WIDTH | 48 | Printer paper width in characters |
/// | PRINTER_ADDR | - | Thermal printer, e.g. 192.168.1.50:9100 |
/// | LOG_LEVEL | info | Log level |
/// | LOG_JSON | false | JSON log lines |
/// | ENVIRONMENT | development | development / production |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub api_base_url: String,
    pub business_id: Option<String>,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub cloudinary_cloud_name: String,
    pub cloudinary_upload_preset: String,
    pub cloudinary_folder: Option<String>,
    pub whatsapp_country_code: String,
    pub receipt_width: usize,
    pub printer_addr: Option<String>,
    pub log_level: String,
    pub log_json: bool,
    pub environment: String,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./work_dir")),
            api_base_url: var("API_BASE_URL").unwrap_or_else(|| "http://localhost:5000".into()),
            business_id: var("BUSINESS_ID"),
            auth_token: var("AUTH_TOKEN"),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            cloudinary_cloud_name: var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            cloudinary_upload_preset: var("CLOUDINARY_UPLOAD_PRESET").unwrap_or_default(),
            cloudinary_folder: var("CLOUDINARY_FOLDER"),
            whatsapp_country_code: var("WHATSAPP_COUNTRY_CODE").unwrap_or_else(|| "91".into()),
            receipt_width: var("RECEIPT_WIDTH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(48),
            printer_addr: var("PRINTER_ADDR"),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: var("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    /// Load `.env` (if present), then read the environment
    pub fn load() -> Self {
        if let Err(e) = dotenv::dotenv()
            && !e.not_found()
        {
            eprintln!("Failed to read .env: {}", e);
        }
        Self::from_env()
    }

    /// Defaults rooted at `work_dir`, for tests and embedding
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::from_env()
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.work_dir.join("bill_desk.redb")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }

    /// Configured thermal printer, if any
    pub fn printer(&self) -> BillingResult<Option<NetworkPrinter>> {
        Ok(self
            .printer_addr
            .as_deref()
            .map(NetworkPrinter::parse)
            .transpose()?)
    }

    pub fn receipt_renderer(&self) -> EscPosReceiptRenderer {
        EscPosReceiptRenderer::new(self.receipt_width)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
