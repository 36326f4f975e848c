//! Application start-up: pick the vendor the service will talk to.
//!
//! Outside a browser (server-side rendering, native tests) or when the
//! configuration asks for it, the [`StripeMock`] is selected instead of the
//! real `window.Stripe` binding. Nothing global is mutated; the choice is
//! returned in a [`Bootstrap`] and handed to the service.

use std::fmt;
use std::rc::Rc;

use crate::bindings::JsStripeVendor;
use crate::config::StripeConfig;
use crate::error::ConfigError;
use crate::loader::{DomScriptLoader, ScriptLoader};
use crate::logging::LOG_TARGET;
use crate::mock::StripeMock;
use crate::service::StripeService;
use crate::vendor::StripeVendor;

/// Where the application is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeEnv {
    /// A browser with a `window` object.
    Browser,
    /// Server-side rendering or any native process.
    Server,
}

impl RuntimeEnv {
    pub fn detect() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if web_sys::window().is_some() {
                return RuntimeEnv::Browser;
            }
        }
        RuntimeEnv::Server
    }
}

/// Result of the start-up step.
pub struct Bootstrap {
    config: StripeConfig,
    vendor: Rc<dyn StripeVendor>,
    mocked: bool,
}

impl Bootstrap {
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    pub fn vendor(&self) -> Rc<dyn StripeVendor> {
        Rc::clone(&self.vendor)
    }

    /// Whether the mock vendor was selected.
    pub fn is_mocked(&self) -> bool {
        self.mocked
    }

    pub fn into_service(self, loader: Rc<dyn ScriptLoader>) -> Result<StripeService, ConfigError> {
        StripeService::new(self.config, self.vendor, loader)
    }
}

impl fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrap")
            .field("config", &self.config)
            .field("mocked", &self.mocked)
            .finish()
    }
}

/// Choose between the real Stripe.js binding and the mock.
///
/// On a server the mock flag is forced on as well, so the service never
/// tries to fetch a script there.
pub fn initialize(mut config: StripeConfig, env: RuntimeEnv) -> Bootstrap {
    if config.debug {
        log::info!(target: LOG_TARGET, "StripeService: initialize");
    }

    let mocked = env == RuntimeEnv::Server || config.mock;
    let vendor: Rc<dyn StripeVendor> = if mocked {
        config.mock = true;
        Rc::new(StripeMock::new())
    } else {
        Rc::new(JsStripeVendor::new())
    };

    Bootstrap {
        config,
        vendor,
        mocked,
    }
}

/// Detect the runtime, select the vendor and build the service with the DOM
/// script loader.
pub fn start(config: StripeConfig) -> Result<StripeService, ConfigError> {
    initialize(config, RuntimeEnv::detect()).into_service(Rc::new(DomScriptLoader::new()))
}
