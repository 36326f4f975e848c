//! yew_stripe_tokens/src/bindings.rs
//!
//! Low‐level wasm-bindgen bindings to the Stripe.js v2 global.
//!
//! Exposes the raw `window.Stripe` entry points used for tokenization and
//! [`JsStripeVendor`], the [`StripeVendor`] implementation backed by them.
//! Calling any of these before Stripe.js has loaded throws on the JS side.

use gloo_utils::format::JsValueSerdeExt;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use web_sys::js_sys::{Array, Function, Reflect};

use crate::callback::TokenCallback;
use crate::logging::LOG_TARGET;
use crate::vendor::{CardHelper, HelperFn, StripeVendor, TokenKind};

#[wasm_bindgen]
extern "C" {
    //------------------------------------------------------------------------------
    // Configuration
    //------------------------------------------------------------------------------

    /// `Stripe.setPublishableKey(key)`
    #[wasm_bindgen(js_namespace = Stripe, js_name = setPublishableKey)]
    pub fn set_publishable_key(key: &str);

    //------------------------------------------------------------------------------
    // Tokenization
    //------------------------------------------------------------------------------

    /// `Stripe.card.createToken(data, (status, response) => ...)`
    #[wasm_bindgen(js_namespace = ["Stripe", "card"], js_name = createToken)]
    pub fn card_create_token(data: &JsValue, callback: &JsValue);

    /// `Stripe.bankAccount.createToken(data, (status, response) => ...)`
    #[wasm_bindgen(js_namespace = ["Stripe", "bankAccount"], js_name = createToken)]
    pub fn bank_account_create_token(data: &JsValue, callback: &JsValue);

    /// `Stripe.piiData.createToken(data, (status, response) => ...)`
    #[wasm_bindgen(js_namespace = ["Stripe", "piiData"], js_name = createToken)]
    pub fn pii_data_create_token(data: &JsValue, callback: &JsValue);
}

/// [`StripeVendor`] backed by `window.Stripe`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsStripeVendor;

impl JsStripeVendor {
    pub fn new() -> Self {
        Self
    }
}

impl StripeVendor for JsStripeVendor {
    fn set_publishable_key(&self, key: &str) {
        set_publishable_key(key);
    }

    fn create_token(&self, kind: TokenKind, data: Value, callback: TokenCallback) {
        let data_js = match data.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
            Ok(js) => js,
            Err(err) => {
                log::error!(target: LOG_TARGET, "StripeService: could not hand {kind} data to Stripe.js: {err}");
                callback.call(
                    400,
                    json!({ "error": { "type": "invalid_request_error", "message": err.to_string() } }),
                );
                return;
            }
        };

        let handler = Closure::once_into_js(move |status: u16, response: JsValue| {
            let response = response.into_serde::<Value>().unwrap_or(Value::Null);
            callback.call(status, response);
        });

        match kind {
            TokenKind::Card => card_create_token(&data_js, &handler),
            TokenKind::BankAccount => bank_account_create_token(&data_js, &handler),
            TokenKind::PiiData => pii_data_create_token(&data_js, &handler),
        }
    }

    fn card_helper(&self, helper: CardHelper) -> Option<HelperFn> {
        let window = web_sys::window()?;
        let stripe = Reflect::get(&window, &JsValue::from_str("Stripe")).ok()?;
        let card = Reflect::get(&stripe, &JsValue::from_str("card")).ok()?;
        let function = Reflect::get(&card, &JsValue::from_str(helper.js_name()))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;

        Some(std::rc::Rc::new(move |args: &[Value]| {
            let js_args = Array::new();
            for arg in args {
                js_args.push(&JsValue::from_serde(arg).unwrap_or(JsValue::UNDEFINED));
            }
            function
                .apply(&card, &js_args)
                .ok()
                .and_then(|result| result.into_serde::<Value>().ok())
                .unwrap_or(Value::Null)
        }))
    }
}
