//! Commit and share workflows
//!
//! Commit runs strictly in order and stops at the first failing step:
//!
//! 1. Push merged lines (only when extras are being previewed)
//! 2. Render the receipt as currently shown
//! 3. Upload it to file storage
//! 4. Record the link on the bill
//! 5. Cache the link locally and reset the editor
//!
//! Remote side effects of completed steps are not rolled back. A retry after
//! a failure at step 3 or 4 resends the same full line list, which replaces
//! the server's lines wholesale, so repeating step 1 is harmless.

use crate::config::Config;
use crate::context::BillingContext;
use crate::error::{BillingError, BillingResult, CommitStep};
use crate::receipt::{EscPosReceiptRenderer, HtmlReceiptRenderer, ReceiptRenderer, print_receipt};
use crate::service::{BillPersistence, FileStorage, MenuCatalog, OrderSource};
use crate::session::BillSession;
use crate::share::{ShareIntent, compose_share, normalize_phone};
use crate::store::LocalStore;
use pos_client::{ClientConfig, ClientError, CloudinaryConfig, CloudinaryUploader, HttpClient};
use pos_printer::Printer;
use shared::util::now_millis;
use shared::{BillView, StoredBillLink};
use std::sync::Arc;
use tracing::instrument;

/// Result of a successful commit
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub link: StoredBillLink,
    /// Whether extras were pushed to the server
    pub items_updated: bool,
}

#[derive(Clone)]
pub struct BillDesk {
    context: BillingContext,
    persistence: Arc<dyn BillPersistence>,
    storage: Arc<dyn FileStorage>,
    renderer: Arc<dyn ReceiptRenderer>,
    country_code: String,
    /// Business whose menu and profile are loaded with each order
    business_id: Option<String>,
}

impl BillDesk {
    pub fn new(
        context: BillingContext,
        persistence: Arc<dyn BillPersistence>,
        storage: Arc<dyn FileStorage>,
        renderer: Arc<dyn ReceiptRenderer>,
    ) -> Self {
        Self {
            context,
            persistence,
            storage,
            renderer,
            country_code: "91".to_string(),
            business_id: None,
        }
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    pub fn with_business(mut self, business_id: impl Into<String>) -> Self {
        self.business_id = Some(business_id.into());
        self
    }

    /// Open the local store under the configured work dir
    pub fn open_context(config: &Config) -> BillingResult<BillingContext> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            BillingError::Config(format!(
                "Cannot create work dir {}: {}",
                config.work_dir.display(),
                e
            ))
        })?;
        Ok(BillingContext::new(LocalStore::open(config.store_path())?))
    }

    /// Wire the network collaborators from configuration
    ///
    /// Returns the desk and the API client, which also serves as order
    /// source and menu catalog. Fails with `NotAuthenticated` when neither
    /// `AUTH_TOKEN` nor a stored credential is available.
    pub fn from_config(config: &Config) -> BillingResult<(Self, Arc<HttpClient>)> {
        let context = Self::open_context(config)?;

        let token = match config.auth_token.clone() {
            Some(token) => token,
            None => context.require_credential()?,
        };

        let api = ClientConfig::new(&config.api_base_url)
            .with_token(token)
            .with_timeout(config.request_timeout_secs)
            .build_http_client()
            .map_err(|e| BillingError::Config(e.to_string()))?;
        let api = Arc::new(api);

        let mut cloudinary = CloudinaryConfig::new(
            &config.cloudinary_cloud_name,
            &config.cloudinary_upload_preset,
        );
        if let Some(folder) = &config.cloudinary_folder {
            cloudinary = cloudinary.with_folder(folder);
        }
        let uploader =
            CloudinaryUploader::new(cloudinary).map_err(|e| BillingError::Config(e.to_string()))?;

        tracing::info!(
            api = %config.api_base_url,
            environment = %config.environment,
            "Bill desk ready"
        );

        let mut desk = Self::new(
            context,
            api.clone(),
            Arc::new(uploader),
            Arc::new(HtmlReceiptRenderer::new()),
        )
        .with_country_code(&config.whatsapp_country_code);
        if let Some(business_id) = &config.business_id {
            desk = desk.with_business(business_id);
        }

        Ok((desk, api))
    }

    pub fn context(&self) -> &BillingContext {
        &self.context
    }

    /// Load an order, with the configured business's menu and profile
    ///
    /// Without a business the session has an empty menu and the default
    /// profile; extras can still be composed by hand.
    pub async fn open_session(
        &self,
        source: &dyn OrderSource,
        catalog: &dyn MenuCatalog,
        order_id: &str,
    ) -> BillingResult<BillSession> {
        let mut session = BillSession::load(source, order_id).await?;
        match &self.business_id {
            Some(business_id) => session.load_catalog(catalog, business_id).await?,
            None => tracing::debug!(order_id, "No business configured, menu not loaded"),
        }
        Ok(session)
    }

    /// Bill for the session with the saved rates
    pub fn bill(&self, session: &BillSession) -> BillingResult<BillView> {
        Ok(session.bill(&self.context.rates()?))
    }

    /// Store the bill remotely and remember its link
    #[instrument(skip_all, fields(order_id = %session.order().order_id))]
    pub async fn commit(&self, session: &mut BillSession) -> BillingResult<CommitOutcome> {
        let bill_id = session.numeric_id()?;
        let order_id = session.order().order_id.clone();
        let rates = self.context.rates()?;

        // 1. Replace line items when extras are being previewed
        let committed_lines = if session.editor().has_pending_changes() {
            let lines = session.editor().merged_lines(session.order());
            self.persistence
                .update_items(bill_id, &lines)
                .await
                .map_err(|e| BillingError::commit(CommitStep::UpdateItems, e))?;
            tracing::info!(bill_id, lines = lines.len(), "Bill items updated");
            Some(lines)
        } else {
            None
        };

        // 2. Render what is on screen
        let artifact = self
            .renderer
            .render(&session.receipt_document(&rates, None))?;

        // 3. Upload
        let uploaded = self
            .storage
            .upload(artifact.bytes, &artifact.file_name, artifact.content_type)
            .await
            .map_err(|e| BillingError::commit(CommitStep::Upload, e))?;

        // 4. Record the link
        if let Err(e) = self
            .persistence
            .store_link(bill_id, &uploaded.url, &uploaded.public_id)
            .await
        {
            tracing::warn!(
                public_id = %uploaded.public_id,
                "Uploaded receipt left without a bill link"
            );
            return Err(BillingError::commit(CommitStep::StoreLink, e));
        }

        // 5. Local bookkeeping
        let link = StoredBillLink {
            url: uploaded.url,
            public_id: uploaded.public_id,
            stored_at: now_millis(),
        };
        let items_updated = committed_lines.is_some();
        session.complete_commit(committed_lines);

        self.cache_link(&order_id, &link);

        crate::audit_log!(
            order_id = %order_id,
            bill_id,
            link = %link.url,
            items_updated,
            "Bill stored"
        );

        Ok(CommitOutcome {
            link,
            items_updated,
        })
    }

    /// Link to the stored bill, committing only when there is none yet
    ///
    /// Previewed extras always trigger a fresh commit since any existing
    /// link shows the bill without them.
    #[instrument(skip_all, fields(order_id = %session.order().order_id))]
    pub async fn ensure_share_link(
        &self,
        session: &mut BillSession,
    ) -> BillingResult<StoredBillLink> {
        if session.editor().has_pending_changes() {
            return Ok(self.commit(session).await?.link);
        }

        let order_id = session.order().order_id.clone();
        if let Some(link) = self.context.share_link(&order_id)? {
            tracing::debug!("Using cached bill link");
            return Ok(link);
        }

        let bill_id = session.numeric_id()?;
        match self.persistence.stored_bill(bill_id).await {
            Ok(stored) => {
                if let Some(url) = stored.link() {
                    let link = StoredBillLink {
                        url: url.to_string(),
                        public_id: String::new(),
                        stored_at: now_millis(),
                    };
                    self.cache_link(&order_id, &link);
                    tracing::debug!("Using bill link stored on the server");
                    return Ok(link);
                }
            }
            Err(ClientError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        Ok(self.commit(session).await?.link)
    }

    /// The bill is stored remotely by now; a cache miss only costs a lookup
    /// on the next share
    fn cache_link(&self, order_id: &str, link: &StoredBillLink) {
        if let Err(e) = self.context.remember_link(order_id, link) {
            tracing::error!(order_id, error = %e, "Failed to cache bill link");
        }
    }

    /// Validate the phone, make sure the bill is stored, build the deep link
    #[instrument(skip_all, fields(order_id = %session.order().order_id))]
    pub async fn share(&self, session: &mut BillSession, phone: &str) -> BillingResult<ShareIntent> {
        // Reject bad input before any network call
        normalize_phone(phone)?;

        let link = self.ensure_share_link(session).await?;
        let intent = compose_share(
            phone,
            &link.url,
            &session.business().name,
            &self.country_code,
        )?;

        crate::audit_log!(
            order_id = %session.order().order_id,
            link = %link.url,
            "Bill shared"
        );
        Ok(intent)
    }

    /// Print the bill as currently shown, with a QR code of the stored link
    pub async fn print<P: Printer>(
        &self,
        session: &BillSession,
        printer: &P,
        renderer: &EscPosReceiptRenderer,
    ) -> BillingResult<()> {
        let rates = self.context.rates()?;
        let link = self
            .context
            .share_link(&session.order().order_id)?
            .map(|l| l.url);
        print_receipt(printer, renderer, &session.receipt_document(&rates, link.as_deref())).await
    }
}
