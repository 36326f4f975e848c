//! yew_stripe_tokens/src/service.rs
//!
//! The long-lived tokenization service.
//!
//! This module provides:
//! - [`StripeService`], a cheap `Rc` handle holding configuration, the vendor
//!   and the script loader.
//! - `load()` to fetch Stripe.js on demand (lazy mode) and configure the vendor.
//! - `configure()` to register the publishable key and build the card helper
//!   table, at most once.
//! - `create_card_token()`, `create_bank_account_token()` and
//!   `create_pii_data_token()`, wrapping the vendor's callback API in futures.
//! - [`CardFacade`] / [`TokenFacade`], the `card`, `bankAccount` and
//!   `piiData` views available once configured.
//!
//! # Example Usage
//! ```rust
//! use std::rc::Rc;
//! use futures::executor::block_on;
//! use yew_stripe_tokens::{DomScriptLoader, StripeConfig, StripeMock, StripeService};
//! use yew_stripe_tokens::params::CardDetails;
//!
//! let config = StripeConfig::new("pk_test_123").with_mock(true);
//! let service = StripeService::new(config, Rc::new(StripeMock::new()), Rc::new(DomScriptLoader::new()))
//!     .expect("publishable key is set");
//!
//! let card = CardDetails {
//!     number: "4242424242424242".into(),
//!     cvc: "123".into(),
//!     exp_month: 12,
//!     exp_year: 2030,
//!     ..Default::default()
//! };
//! let token = block_on(service.create_card_token(&card)).expect("mock always succeeds");
//! assert_eq!(token.id(), Some("tok_card_mock"));
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use serde::Serialize;
use serde_json::Value;

use crate::callback;
use crate::config::StripeConfig;
use crate::error::{ConfigError, LoadError, TokenError};
use crate::loader::{LoadFuture, ScriptLoader};
use crate::logging::LOG_TARGET;
use crate::response::TokenResponse;
use crate::vendor::{CardHelper, HelperFn, StripeVendor, TokenKind};
use crate::waiter::{PendingCounter, PendingWaiter};

/// Future returned by every tokenization call.
pub type TokenFuture = LocalBoxFuture<'static, Result<TokenResponse, TokenError>>;

type SharedLoad = Shared<LoadFuture>;

/// Handle to the tokenization service. Clones share the same state.
#[derive(Clone)]
pub struct StripeService {
    inner: Rc<Inner>,
}

struct Inner {
    config: StripeConfig,
    vendor: Rc<dyn StripeVendor>,
    loader: Rc<dyn ScriptLoader>,
    configured: Cell<bool>,
    card_helpers: RefCell<Option<Rc<CardHelpers>>>,
    loading: RefCell<Option<SharedLoad>>,
    pending: Rc<PendingCounter>,
}

impl StripeService {
    /// Build the service. Unless lazy loading a real vendor, the vendor is
    /// configured right away.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingPublishableKey`] when the key is empty.
    pub fn new(
        config: StripeConfig,
        vendor: Rc<dyn StripeVendor>,
        loader: Rc<dyn ScriptLoader>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let service = Self {
            inner: Rc::new(Inner {
                config,
                vendor,
                loader,
                configured: Cell::new(false),
                card_helpers: RefCell::new(None),
                loading: RefCell::new(None),
                pending: Rc::new(PendingCounter::default()),
            }),
        };

        if service.inner.config.testing {
            service.debug(format_args!("pending-call waiter enabled"));
        }

        if !service.loads_script() {
            service.configure();
        }

        Ok(service)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.inner.config
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.get()
    }

    /// Tokenization calls issued but not yet settled.
    pub fn pending_calls(&self) -> usize {
        self.inner.pending.count()
    }

    /// Waiter for test harnesses; only available with `testing` enabled.
    pub fn waiter(&self) -> Option<PendingWaiter> {
        self.inner
            .config
            .testing
            .then(|| PendingWaiter::new(Rc::clone(&self.inner.pending)))
    }

    fn loads_script(&self) -> bool {
        self.inner.config.lazy_load && !self.inner.config.mock
    }

    /// Register the publishable key and build the card helper table.
    /// Only the first call has any effect.
    pub fn configure(&self) {
        let inner = &self.inner;
        if inner.configured.get() {
            return;
        }

        inner.vendor.set_publishable_key(&inner.config.publishable_key);
        let helpers = CardHelpers::from_vendor(inner.vendor.as_ref());
        *inner.card_helpers.borrow_mut() = Some(Rc::new(helpers));
        inner.configured.set(true);

        self.debug(format_args!("configured"));
    }

    /// Make sure Stripe.js is available, then [`configure`](Self::configure).
    ///
    /// In lazy mode (and not mocking) the script loader is asked for the
    /// script; concurrent and later callers share that load. Otherwise this
    /// resolves immediately. A failed load is dropped so the next call asks
    /// the loader again.
    pub fn load(&self) -> impl std::future::Future<Output = Result<(), LoadError>> + 'static {
        let service = self.clone();
        let script = self.script_load();
        async move {
            if let Some(script) = script {
                if let Err(err) = script.clone().await {
                    service.forget_load(&script);
                    return Err(err);
                }
            }
            service.configure();
            Ok(())
        }
    }

    fn script_load(&self) -> Option<SharedLoad> {
        if !self.loads_script() {
            return None;
        }
        let mut loading = self.inner.loading.borrow_mut();
        let load = loading.get_or_insert_with(|| {
            let url = &self.inner.config.script_url;
            self.debug(format_args!("loading {url}"));
            self.inner.loader.load(url).shared()
        });
        Some(load.clone())
    }

    fn forget_load(&self, failed: &SharedLoad) {
        let mut loading = self.inner.loading.borrow_mut();
        if loading.as_ref().is_some_and(|current| current.ptr_eq(failed)) {
            *loading = None;
        }
    }

    /// `Stripe.card.createToken`
    pub fn create_card_token<T: Serialize + ?Sized>(&self, card: &T) -> TokenFuture {
        self.create_token(TokenKind::Card, card)
    }

    /// `Stripe.bankAccount.createToken`
    pub fn create_bank_account_token<T: Serialize + ?Sized>(&self, bank_account: &T) -> TokenFuture {
        self.create_token(TokenKind::BankAccount, bank_account)
    }

    /// `Stripe.piiData.createToken`
    pub fn create_pii_data_token<T: Serialize + ?Sized>(&self, pii_data: &T) -> TokenFuture {
        self.create_token(TokenKind::PiiData, pii_data)
    }

    /// Tokenize `data` through `Stripe.<kind>.createToken`.
    ///
    /// The call counts as pending from the moment this returns until the
    /// future settles. A response with an `error` field fails with
    /// [`TokenError::Rejected`] holding that response unchanged.
    ///
    /// There is no timeout: if the vendor never calls back, the future never
    /// resolves and the call stays pending.
    pub fn create_token<T: Serialize + ?Sized>(&self, kind: TokenKind, data: &T) -> TokenFuture {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(err) => return future::ready(Err(TokenError::from(err))).boxed_local(),
        };
        self.debug(format_args!("{kind}.createToken: {data}"));

        let pending = self.inner.pending.begin();
        let service = self.clone();
        async move {
            let _pending = pending;
            service.load().await?;

            let (callback, settled) = callback::channel();
            service.inner.vendor.create_token(kind, data, callback);
            let (status, response) = match settled.await {
                Ok(answer) => answer,
                // vendor dropped the callback without answering
                Err(_canceled) => future::pending().await,
            };

            service.debug(format_args!(
                "{kind}.createToken handler - status {status}, response: {response}"
            ));
            let response = TokenResponse::from(response);
            if response.is_error() {
                Err(TokenError::Rejected(response))
            } else {
                Ok(response)
            }
        }
        .boxed_local()
    }

    /// The `card` facade, once configured.
    pub fn card(&self) -> Option<CardFacade> {
        let helpers = self.inner.card_helpers.borrow().clone()?;
        Some(CardFacade {
            service: self.clone(),
            helpers,
        })
    }

    /// The `bankAccount` facade, once configured.
    pub fn bank_account(&self) -> Option<TokenFacade> {
        self.facade(TokenKind::BankAccount)
    }

    /// The `piiData` facade, once configured.
    pub fn pii_data(&self) -> Option<TokenFacade> {
        self.facade(TokenKind::PiiData)
    }

    fn facade(&self, kind: TokenKind) -> Option<TokenFacade> {
        self.is_configured().then(|| TokenFacade {
            service: self.clone(),
            kind,
        })
    }

    fn debug(&self, message: fmt::Arguments<'_>) {
        if self.inner.config.debugging_enabled {
            log::info!(target: LOG_TARGET, "StripeService: {message}");
        }
    }
}

impl PartialEq for StripeService {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for StripeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeService")
            .field("config", &self.inner.config)
            .field("configured", &self.inner.configured.get())
            .field("pending_calls", &self.inner.pending.count())
            .finish()
    }
}

/// Card helpers copied from the vendor at configuration time.
struct CardHelpers {
    helpers: HashMap<CardHelper, HelperFn>,
}

impl CardHelpers {
    fn from_vendor(vendor: &dyn StripeVendor) -> Self {
        let helpers = CardHelper::ALL
            .into_iter()
            .map(|helper| {
                let function = vendor.card_helper(helper).unwrap_or_else(|| {
                    log::error!(
                        target: LOG_TARGET,
                        "StripeService: {helper} on Stripe.card is no longer available"
                    );
                    let noop: HelperFn = Rc::new(|_: &[Value]| Value::Null);
                    noop
                });
                (helper, function)
            })
            .collect();
        Self { helpers }
    }

    fn call(&self, helper: CardHelper, args: &[Value]) -> Value {
        self.helpers
            .get(&helper)
            .map(|function| function(args))
            .unwrap_or(Value::Null)
    }
}

/// `card` facade: token creation plus the Stripe.js validation helpers.
///
/// Helpers that Stripe.js no longer provides answer `None`.
#[derive(Clone)]
pub struct CardFacade {
    service: StripeService,
    helpers: Rc<CardHelpers>,
}

impl CardFacade {
    pub fn create_token<T: Serialize + ?Sized>(&self, card: &T) -> TokenFuture {
        self.service.create_card_token(card)
    }

    /// Brand name, e.g. `"Visa"` or `"Unknown"`.
    pub fn card_type(&self, number: &str) -> Option<String> {
        self.helpers
            .call(CardHelper::CardType, &[Value::from(number)])
            .as_str()
            .map(str::to_string)
    }

    pub fn validate_card_number(&self, number: &str) -> Option<bool> {
        self.helpers
            .call(CardHelper::ValidateCardNumber, &[Value::from(number)])
            .as_bool()
    }

    pub fn validate_cvc(&self, cvc: &str) -> Option<bool> {
        self.helpers
            .call(CardHelper::ValidateCvc, &[Value::from(cvc)])
            .as_bool()
    }

    pub fn validate_expiry(&self, month: &str, year: &str) -> Option<bool> {
        self.helpers
            .call(
                CardHelper::ValidateExpiry,
                &[Value::from(month), Value::from(year)],
            )
            .as_bool()
    }
}

impl fmt::Debug for CardFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardFacade").finish_non_exhaustive()
    }
}

/// `bankAccount` / `piiData` facade.
#[derive(Clone, Debug)]
pub struct TokenFacade {
    service: StripeService,
    kind: TokenKind,
}

impl TokenFacade {
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn create_token<T: Serialize + ?Sized>(&self, data: &T) -> TokenFuture {
        self.service.create_token(self.kind, data)
    }
}
