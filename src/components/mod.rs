//! Yew integration: share one [`StripeService`] with every component.
//!
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_stripe_tokens::{start, StripeConfig, StripeServiceProvider, use_stripe_loaded};
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     let service = use_memo((), |_| {
//!         start(StripeConfig::new("pk_test_123").with_lazy_load(true)).expect("stripe config")
//!     });
//!     html! {
//!         <StripeServiceProvider service={(*service).clone()}>
//!             <Checkout />
//!         </StripeServiceProvider>
//!     }
//! }
//!
//! #[function_component(Checkout)]
//! fn checkout() -> Html {
//!     let ready = use_stripe_loaded();
//!     html! { <button disabled={!ready}>{ "Pay" }</button> }
//! }
//! ```

use yew::functional::hook;
use yew::prelude::*;

use crate::logging::LOG_TARGET;
use crate::service::StripeService;

#[derive(Properties, PartialEq)]
pub struct StripeServiceProviderProps {
    pub service: StripeService,
    #[prop_or_default]
    pub children: Children,
}

/// Makes `service` available to [`use_stripe_service`] below it.
#[function_component(StripeServiceProvider)]
pub fn stripe_service_provider(props: &StripeServiceProviderProps) -> Html {
    html! {
        <ContextProvider<StripeService> context={props.service.clone()}>
            { for props.children.iter() }
        </ContextProvider<StripeService>>
    }
}

/// The service provided by the nearest [`StripeServiceProvider`].
#[hook]
pub fn use_stripe_service() -> Option<StripeService> {
    use_context::<StripeService>()
}

/// Kick off `load()` once and report whether the service is configured.
///
/// # Returns
/// - `false` while Stripe.js is being fetched (or when no provider exists).
/// - `true` once the service is configured.
#[hook]
pub fn use_stripe_loaded() -> bool {
    let service = use_stripe_service();
    let loaded = use_state(|| service.as_ref().is_some_and(StripeService::is_configured));

    {
        let loaded = loaded.clone();
        use_effect_with(service, move |service| {
            if let Some(service) = service.clone() {
                if !*loaded {
                    wasm_bindgen_futures::spawn_local(async move {
                        match service.load().await {
                            Ok(()) => loaded.set(true),
                            Err(err) => log::error!(target: LOG_TARGET, "StripeService: {err}"),
                        }
                    });
                }
            }
            || ()
        });
    }

    *loaded
}
