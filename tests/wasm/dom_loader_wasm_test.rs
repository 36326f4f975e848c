//! Browser-only checks for the DOM script loader.
//!
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use yew_stripe_tokens::{DomScriptLoader, LoadError, ScriptLoader};

wasm_bindgen_test_configure!(run_in_browser);

const DATA_SCRIPT: &str = "data:text/javascript,window.__stripeLoaderProbe%20%3D%20true%3B";

#[wasm_bindgen_test]
async fn loads_script_once_per_url() {
    let loader = DomScriptLoader::new();

    loader.load(DATA_SCRIPT).await.unwrap();
    loader.load(DATA_SCRIPT).await.unwrap();

    let document = web_sys::window().unwrap().document().unwrap();
    let scripts = document
        .get_elements_by_tag_name("script")
        .length();
    let injected = (0..scripts)
        .filter_map(|i| document.get_elements_by_tag_name("script").item(i))
        .filter(|el| el.get_attribute("src").as_deref() == Some(DATA_SCRIPT))
        .count();
    assert_eq!(injected, 1);
}

#[wasm_bindgen_test]
async fn failed_load_reports_url() {
    let loader = DomScriptLoader::new();
    let url = "https://127.0.0.1:9/missing-stripe.js";

    let err = loader.load(url).await.unwrap_err();

    assert_eq!(err, LoadError::Failed(url.to_string()));
}
