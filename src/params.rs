//! Typed request records for the three `createToken` calls.
//!
//! Field names follow the Stripe.js v2 documentation. Any other
//! `Serialize` value (including a raw `serde_json::Value`) is accepted by
//! the service as well; these types only save you from typos.

use serde::{Deserialize, Serialize};

/// Data for `Stripe.card.createToken`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CardDetails {
    pub number: String,
    pub cvc: String,
    pub exp_month: u32,
    pub exp_year: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_country: Option<String>,
}

/// Data for `Stripe.bankAccount.createToken`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BankAccountDetails {
    /// Two-letter ISO country code, e.g. `"US"`.
    pub country: String,
    /// Three-letter ISO currency code, e.g. `"usd"`.
    pub currency: String,
    pub account_number: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    /// `"individual"` or `"company"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_type: Option<String>,
}

/// Data for `Stripe.piiData.createToken`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PiiDetails {
    pub personal_id_number: String,
}
