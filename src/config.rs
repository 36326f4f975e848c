//! yew_stripe_tokens/src/config.rs
//!
//! Service configuration, read from the `stripe` section of the application
//! environment:
//!
//! ```json
//! {
//!   "LOG_STRIPE_SERVICE": false,
//!   "stripe": {
//!     "publishableKey": "pk_test_...",
//!     "lazyLoad": true,
//!     "mock": false,
//!     "debug": false,
//!     "debuggingEnabled": false,
//!     "testing": false
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::JsValue;

use crate::error::ConfigError;

/// Stripe.js v2, the release exposing the callback-based tokenization API.
pub const DEFAULT_SCRIPT_URL: &str = "https://js.stripe.com/v2/";

/// Immutable service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StripeConfig {
    /// Your Stripe publishable key (`pk_…`). Required.
    pub publishable_key: String,
    /// Defer fetching Stripe.js until the first tokenization call.
    pub lazy_load: bool,
    /// Use the in-process [`StripeMock`](crate::mock::StripeMock) vendor.
    pub mock: bool,
    /// Announce start-up (`StripeService: initialize`).
    pub debug: bool,
    /// Emit `StripeService:` debug lines through the `log` facade.
    pub debugging_enabled: bool,
    /// Expose a [`PendingWaiter`](crate::waiter::PendingWaiter) for test harnesses.
    pub testing: bool,
    /// Where Stripe.js is fetched from when lazy loading.
    pub script_url: String,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            publishable_key: String::new(),
            lazy_load: false,
            mock: false,
            debug: false,
            debugging_enabled: false,
            testing: false,
            script_url: DEFAULT_SCRIPT_URL.to_string(),
        }
    }
}

impl StripeConfig {
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            ..Self::default()
        }
    }

    pub fn with_lazy_load(mut self, lazy_load: bool) -> Self {
        self.lazy_load = lazy_load;
        self
    }

    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_debugging(mut self, enabled: bool) -> Self {
        self.debugging_enabled = enabled;
        self
    }

    pub fn with_testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    pub fn with_script_url(mut self, url: impl Into<String>) -> Self {
        self.script_url = url.into();
        self
    }

    /// Fails when no publishable key was provided.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.publishable_key.trim().is_empty() {
            return Err(ConfigError::MissingPublishableKey);
        }
        Ok(())
    }

    /// Parse the `stripe` section on its own.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the `stripe` section of a whole application environment.
    ///
    /// A missing section yields the defaults (and therefore fails
    /// [`validate`](Self::validate)). A truthy top-level `LOG_STRIPE_SERVICE`
    /// (JavaScript truthiness: `true`, non-zero numbers, non-empty strings)
    /// turns the start-up announcement on, like `stripe.debug` does.
    pub fn from_environment(environment: &Value) -> Result<Self, ConfigError> {
        let mut config = match environment.get("stripe") {
            Some(section) => serde_json::from_value(section.clone())?,
            None => Self::default(),
        };

        let log_override = environment
            .get("LOG_STRIPE_SERVICE")
            .is_some_and(is_truthy);
        config.debug = config.debug || log_override;

        Ok(config)
    }

    /// Parse a configuration object handed over from JavaScript.
    pub fn from_js(value: JsValue) -> Result<Self, ConfigError> {
        serde_wasm_bindgen::from_value(value).map_err(|err| ConfigError::InvalidJs(err.to_string()))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
