//! Token responses handed back by Stripe.js.
//!
//! The service never reshapes what the vendor returns: [`TokenResponse`] is a
//! thin wrapper over the raw JSON with a few read-only accessors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw response object passed to a `createToken` callback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenResponse(Value);

impl TokenResponse {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn into_raw(self) -> Value {
        self.0
    }

    /// Token identifier, e.g. `tok_1Fxxxxxx`.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// `true` when the response carries a non-empty `error` field.
    ///
    /// Only the presence of the field decides success; the HTTP-like status
    /// code passed alongside the response is ignored.
    pub fn is_error(&self) -> bool {
        match self.0.get("error") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(_) => true,
        }
    }

    /// Typed view of the `error` payload.
    pub fn error(&self) -> Option<StripeError> {
        if !self.is_error() {
            return None;
        }
        self.0
            .get("error")
            .and_then(|err| serde_json::from_value(err.clone()).ok())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.0
            .get("error")
            .and_then(|err| err.get("message"))
            .and_then(Value::as_str)
    }
}

impl From<Value> for TokenResponse {
    fn from(raw: Value) -> Self {
        Self(raw)
    }
}

/// Representation of a Stripe.js error object.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StripeError {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Stripe’s error type, e.g. `"card_error"`.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Optional Stripe error code, e.g. `"invalid_number"`.
    #[serde(default)]
    pub code: Option<String>,
    /// Name of the offending request field, e.g. `"number"`.
    #[serde(default)]
    pub param: Option<String>,
}
