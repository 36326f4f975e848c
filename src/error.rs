//! yew_stripe_tokens/src/error.rs
//!
//! Error types surfaced by the service.
//!
//! - [`ConfigError`]: the configuration cannot be used (fatal at startup).
//! - [`LoadError`]: the Stripe.js script could not be loaded.
//! - [`TokenError`]: a tokenization call did not produce a token. A vendor
//!   rejection carries the response object exactly as Stripe.js returned it.

use thiserror::Error;

use crate::response::TokenResponse;

/// The service configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "StripeService: Missing Stripe key, please set `stripe.publishableKey` in the application environment"
    )]
    MissingPublishableKey,

    #[error("StripeService: invalid stripe configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("StripeService: invalid stripe configuration: {0}")]
    InvalidJs(String),
}

/// Failure reported by a [`ScriptLoader`](crate::loader::ScriptLoader).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("no global `window` is available")]
    NoWindow,

    #[error("the window has no document")]
    NoDocument,

    #[error("could not insert the script element: {0}")]
    Element(String),

    #[error("failed to load script {0}")]
    Failed(String),

    #[error("script load for {0} was abandoned before it finished")]
    Abandoned(String),
}

/// Outcome of a tokenization call that did not produce a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Stripe.js answered with a response carrying an `error` field.
    #[error("stripe rejected the token request: {}", .0.error_message().unwrap_or("unknown error"))]
    Rejected(TokenResponse),

    #[error(transparent)]
    ScriptLoad(#[from] LoadError),

    /// The request data could not be turned into a JSON object.
    #[error("token data could not be serialized: {0}")]
    InvalidData(#[from] serde_json::Error),
}

impl TokenError {
    /// The vendor response behind a rejection, if this is one.
    pub fn response(&self) -> Option<&TokenResponse> {
        match self {
            TokenError::Rejected(response) => Some(response),
            _ => None,
        }
    }
}
