//! Share a stored bill over WhatsApp
//!
//! Validation happens before anything leaves the device: a bad phone number
//! or a missing link is reported without any network call.

use crate::error::{BillingError, BillingResult};
use reqwest::Url;
use shared::util::phone_digits;

const PHONE_DIGITS: usize = 10;
const WHATSAPP_BASE: &str = "https://wa.me";

/// Ready-to-open share request
#[derive(Debug, Clone, PartialEq)]
pub struct ShareIntent {
    /// 10-digit national number
    pub phone: String,
    pub message: String,
    /// Deep link that opens the chat with `message` pre-filled
    pub url: String,
}

/// Strip separators and require exactly 10 digits
pub fn normalize_phone(input: &str) -> BillingResult<String> {
    let digits = phone_digits(input);
    if digits.len() != PHONE_DIGITS {
        return Err(BillingError::InvalidPhone(digits.len()));
    }
    Ok(digits)
}

pub fn share_message(business_name: &str, link: &str) -> String {
    let name = business_name.trim();
    if name.is_empty() {
        format!("Here is your bill: {}", link)
    } else {
        format!("Thank you for dining at {}! Here is your bill: {}", name, link)
    }
}

/// Build the WhatsApp deep link for a stored bill
pub fn compose_share(
    phone_input: &str,
    link: &str,
    business_name: &str,
    country_code: &str,
) -> BillingResult<ShareIntent> {
    let phone = normalize_phone(phone_input)?;
    let link = link.trim();
    if link.is_empty() {
        return Err(BillingError::MissingShareLink);
    }

    let message = share_message(business_name, link);
    let base = format!("{}/{}{}", WHATSAPP_BASE, phone_digits(country_code), phone);
    let url = Url::parse_with_params(&base, &[("text", message.as_str())])
        .map_err(|e| BillingError::Config(format!("Invalid share URL: {}", e)))?;

    Ok(ShareIntent {
        phone,
        message,
        url: url.into(),
    })
}
