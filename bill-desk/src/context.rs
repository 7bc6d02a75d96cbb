//! Billing context
//!
//! The single place computation and workflows read installation-wide state
//! from: surcharge rates, stored-bill links, the dashboard filter and the
//! login credential. Backed by [`LocalStore`].

use crate::error::{BillingError, BillingResult};
use crate::store::{KEY_AUTH_TOKEN, KEY_DASHBOARD_FILTER, KEY_SURCHARGE_RATES, LocalStore};
use pos_client::HttpClient;
use shared::{DashboardFilter, StoredBillLink, SurchargeRates};
use std::sync::Arc;

#[derive(Clone)]
pub struct BillingContext {
    store: Arc<LocalStore>,
}

impl BillingContext {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    // ========== Surcharge rates ==========

    /// Saved rates, all zero until the first save
    pub fn rates(&self) -> BillingResult<SurchargeRates> {
        Ok(self
            .store
            .get_setting(KEY_SURCHARGE_RATES)?
            .unwrap_or_default())
    }

    pub fn save_rates(&self, rates: &SurchargeRates) -> BillingResult<()> {
        rates.validate()?;
        self.store.put_setting(KEY_SURCHARGE_RATES, rates)?;
        tracing::info!(?rates, "Surcharge rates saved");
        Ok(())
    }

    // ========== Stored bills ==========

    pub fn share_link(&self, order_id: &str) -> BillingResult<Option<StoredBillLink>> {
        Ok(self.store.share_link(order_id)?)
    }

    /// Cache the link and mark the order as stored
    pub fn remember_link(&self, order_id: &str, link: &StoredBillLink) -> BillingResult<()> {
        self.store.record_stored_bill(order_id, link)?;
        Ok(())
    }

    pub fn is_stored(&self, order_id: &str) -> BillingResult<bool> {
        Ok(self.store.is_stored(order_id)?)
    }

    // ========== Dashboard ==========

    pub fn dashboard_filter(&self) -> BillingResult<DashboardFilter> {
        Ok(self
            .store
            .get_setting(KEY_DASHBOARD_FILTER)?
            .unwrap_or_default())
    }

    pub fn set_dashboard_filter(&self, filter: DashboardFilter) -> BillingResult<()> {
        self.store.put_setting(KEY_DASHBOARD_FILTER, &filter)?;
        Ok(())
    }

    // ========== Credential ==========

    pub fn credential(&self) -> BillingResult<Option<String>> {
        let token: Option<String> = self.store.get_setting(KEY_AUTH_TOKEN)?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    /// Credential or [`BillingError::NotAuthenticated`]
    pub fn require_credential(&self) -> BillingResult<String> {
        self.credential()?.ok_or(BillingError::NotAuthenticated)
    }

    pub fn save_credential(&self, token: &str) -> BillingResult<()> {
        self.store.put_setting(KEY_AUTH_TOKEN, &token)?;
        Ok(())
    }

    pub fn clear_credential(&self) -> BillingResult<()> {
        if self.store.remove_setting(KEY_AUTH_TOKEN)? {
            tracing::info!("Credential cleared");
        }
        Ok(())
    }

    /// Log in and persist the returned token
    ///
    /// Returns a client that carries the new token.
    pub async fn sign_in(
        &self,
        client: &HttpClient,
        email: &str,
        password: &str,
    ) -> BillingResult<HttpClient> {
        let response = client.login(email, password).await?;
        self.save_credential(&response.token)?;
        crate::audit_log!(email = %email, "Signed in");
        Ok(client.clone().with_token(response.token))
    }
}
