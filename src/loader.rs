//! yew_stripe_tokens/src/loader.rs
//!
//! Runtime loading of Stripe.js (no inline JS).
//!
//! # Overview
//! [`DomScriptLoader`] injects a single
//! `<script src="https://js.stripe.com/v2/" async>` into `<head>` per URL,
//! resolves once the script's `load` event fires, and hands the same result
//! to every later caller for that URL. A failed load is forgotten (and its
//! element removed) so the next caller can try again.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Function;
use web_sys::HtmlScriptElement;

use crate::error::LoadError;

pub type LoadFuture = LocalBoxFuture<'static, Result<(), LoadError>>;

/// Fetches and executes a remote script.
pub trait ScriptLoader {
    /// Resolves once the script at `url` has been executed.
    fn load(&self, url: &str) -> LoadFuture;
}

type SharedLoad = Shared<LoadFuture>;

/// Loads scripts by appending `<script>` elements to the document head.
#[derive(Default)]
pub struct DomScriptLoader {
    loads: Rc<RefCell<HashMap<String, SharedLoad>>>,
}

impl DomScriptLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScriptLoader for DomScriptLoader {
    fn load(&self, url: &str) -> LoadFuture {
        if let Some(existing) = self.loads.borrow().get(url) {
            return existing.clone().boxed_local();
        }

        let shared = inject_script(url.to_string()).shared();
        self.loads
            .borrow_mut()
            .insert(url.to_string(), shared.clone());

        let loads = Rc::clone(&self.loads);
        let url = url.to_string();
        async move {
            let result = shared.clone().await;
            if result.is_err() {
                let mut loads = loads.borrow_mut();
                if loads.get(&url).is_some_and(|current| current.ptr_eq(&shared)) {
                    loads.remove(&url);
                }
            }
            result
        }
        .boxed_local()
    }
}

fn inject_script(url: String) -> LoadFuture {
    let started = append_script(&url);
    async move {
        let (script, done) = started?;
        match done.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                script.remove();
                Err(err)
            }
            Err(_canceled) => Err(LoadError::Abandoned(url)),
        }
    }
    .boxed_local()
}

type LoadSignal = oneshot::Receiver<Result<(), LoadError>>;

fn append_script(url: &str) -> Result<(HtmlScriptElement, LoadSignal), LoadError> {
    let document = web_sys::window()
        .ok_or(LoadError::NoWindow)?
        .document()
        .ok_or(LoadError::NoDocument)?;

    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(js_to_load_error)?
        .dyn_into()
        .map_err(|_| LoadError::Element("created element is not a <script>".into()))?;

    script.set_src(url);
    script.set_async(true);

    // Whichever event fires first settles the load.
    let (tx, rx) = oneshot::channel();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let tx = Rc::clone(&tx);
        Closure::once_into_js(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        })
    };
    let onerror = {
        let url = url.to_string();
        Closure::once_into_js(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(LoadError::Failed(url)));
            }
        })
    };
    script.set_onload(Some(onload.unchecked_ref::<Function>()));
    script.set_onerror(Some(onerror.unchecked_ref::<Function>()));

    document
        .head()
        .ok_or_else(|| LoadError::Element("document has no <head>".into()))?
        .append_child(&script)
        .map_err(js_to_load_error)?;

    Ok((script, rx))
}

fn js_to_load_error(value: JsValue) -> LoadError {
    LoadError::Element(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
