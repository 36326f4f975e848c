//! In-process stand-in for Stripe.js.
//!
//! [`StripeMock`] implements [`StripeVendor`] without touching the network.
//! It records what it was asked to do, answers token requests with canned
//! responses, and ships card helpers that behave like the Stripe.js v2 ones.
//!
//! ```rust
//! use std::rc::Rc;
//! use serde_json::json;
//! use yew_stripe_tokens::{StripeMock, TokenKind};
//!
//! let mock = Rc::new(
//!     StripeMock::new()
//!         .respond_with(TokenKind::Card, 200, json!({ "id": "tok_x" }))
//!         .fail_with(TokenKind::BankAccount, "bad"),
//! );
//! # let _ = mock;
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use chrono::{Datelike, Utc};
use serde_json::{json, Value};

use crate::callback::TokenCallback;
use crate::vendor::{CardHelper, HelperFn, StripeVendor, TokenKind};

/// A `createToken` call seen by the mock.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenRequest {
    pub kind: TokenKind,
    pub data: Value,
}

struct HeldCallback {
    callback: TokenCallback,
    status: u16,
    response: Value,
}

#[derive(Default)]
struct MockState {
    publishable_keys: Vec<String>,
    requests: Vec<TokenRequest>,
    held: Vec<HeldCallback>,
}

pub struct StripeMock {
    responses: HashMap<TokenKind, (u16, Value)>,
    missing_helpers: HashSet<CardHelper>,
    deferred: bool,
    today: (u32, u32),
    state: RefCell<MockState>,
}

impl Default for StripeMock {
    fn default() -> Self {
        Self::new()
    }
}

impl StripeMock {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            missing_helpers: HashSet::new(),
            deferred: false,
            today: current_year_month(),
            state: RefCell::new(MockState::default()),
        }
    }

    /// Answer every `kind` request with `(status, response)`.
    pub fn respond_with(mut self, kind: TokenKind, status: u16, response: Value) -> Self {
        self.responses.insert(kind, (status, response));
        self
    }

    pub fn respond_all_with(mut self, status: u16, response: Value) -> Self {
        for kind in TokenKind::ALL {
            self.responses.insert(kind, (status, response.clone()));
        }
        self
    }

    /// Answer every `kind` request with a `card_error` carrying `message`.
    pub fn fail_with(self, kind: TokenKind, message: &str) -> Self {
        self.respond_with(
            kind,
            402,
            json!({ "error": { "type": "card_error", "message": message } }),
        )
    }

    /// Hold callbacks until [`flush`](Self::flush) instead of answering inline.
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Pretend this helper is gone from `Stripe.card`.
    pub fn without_helper(mut self, helper: CardHelper) -> Self {
        self.missing_helpers.insert(helper);
        self
    }

    /// Fix the date `validateExpiry` compares against.
    pub fn with_today(mut self, year: u32, month: u32) -> Self {
        self.today = (year, month);
        self
    }

    pub fn publishable_keys(&self) -> Vec<String> {
        self.state.borrow().publishable_keys.clone()
    }

    pub fn requests(&self) -> Vec<TokenRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn held_callbacks(&self) -> usize {
        self.state.borrow().held.len()
    }

    /// Answer every held callback; returns how many were settled.
    pub fn flush(&self) -> usize {
        let held = std::mem::take(&mut self.state.borrow_mut().held);
        held.into_iter()
            .filter(|held| held.callback.call(held.status, held.response.clone()))
            .count()
    }

    fn response_for(&self, kind: TokenKind, data: &Value) -> (u16, Value) {
        match self.responses.get(&kind) {
            Some(canned) => canned.clone(),
            None => (200, default_response(kind, data)),
        }
    }
}

impl StripeVendor for StripeMock {
    fn set_publishable_key(&self, key: &str) {
        self.state
            .borrow_mut()
            .publishable_keys
            .push(key.to_string());
    }

    fn create_token(&self, kind: TokenKind, data: Value, callback: TokenCallback) {
        let (status, response) = self.response_for(kind, &data);
        {
            let mut state = self.state.borrow_mut();
            state.requests.push(TokenRequest { kind, data });
            if self.deferred {
                state.held.push(HeldCallback {
                    callback,
                    status,
                    response,
                });
                return;
            }
        }
        callback.call(status, response);
    }

    fn card_helper(&self, helper: CardHelper) -> Option<HelperFn> {
        if self.missing_helpers.contains(&helper) {
            return None;
        }
        let helper: HelperFn = match helper {
            CardHelper::CardType => Rc::new(|args: &[Value]| {
                Value::String(card_type(&arg_string(args, 0).unwrap_or_default()).to_string())
            }),
            CardHelper::ValidateCardNumber => Rc::new(|args: &[Value]| {
                Value::Bool(arg_string(args, 0).is_some_and(|number| validate_card_number(&number)))
            }),
            CardHelper::ValidateCvc => Rc::new(|args: &[Value]| {
                Value::Bool(arg_string(args, 0).is_some_and(|cvc| validate_cvc(&cvc)))
            }),
            CardHelper::ValidateExpiry => {
                let today = self.today;
                Rc::new(move |args: &[Value]| {
                    let valid = match (arg_string(args, 0), arg_string(args, 1)) {
                        (Some(month), Some(year)) => validate_expiry(&month, &year, today),
                        _ => false,
                    };
                    Value::Bool(valid)
                })
            }
        };
        Some(helper)
    }
}

fn default_response(kind: TokenKind, data: &Value) -> Value {
    match kind {
        TokenKind::Card => {
            let number = data.get("number").and_then(Value::as_str).unwrap_or_default();
            json!({
                "id": "tok_card_mock",
                "object": "token",
                "type": "card",
                "livemode": false,
                "used": false,
                "card": {
                    "object": "card",
                    "brand": card_type(number),
                    "last4": last4(number),
                    "exp_month": data.get("exp_month").cloned().unwrap_or(Value::Null),
                    "exp_year": data.get("exp_year").cloned().unwrap_or(Value::Null),
                }
            })
        }
        TokenKind::BankAccount => {
            let number = data
                .get("account_number")
                .and_then(Value::as_str)
                .unwrap_or_default();
            json!({
                "id": "btok_mock",
                "object": "token",
                "type": "bank_account",
                "livemode": false,
                "used": false,
                "bank_account": {
                    "object": "bank_account",
                    "last4": last4(number),
                    "country": data.get("country").cloned().unwrap_or(Value::Null),
                    "currency": data.get("currency").cloned().unwrap_or(Value::Null),
                }
            })
        }
        TokenKind::PiiData => json!({
            "id": "pii_mock",
            "object": "token",
            "type": "pii",
            "livemode": false,
            "used": false,
        }),
    }
}

/// Helper arguments arrive as strings or numbers, like in JavaScript.
fn arg_string(args: &[Value], index: usize) -> Option<String> {
    match args.get(index)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn digits(input: &str) -> String {
    input.chars().filter(|c| !matches!(c, ' ' | '-')).collect()
}

fn last4(number: &str) -> String {
    let digits: Vec<char> = digits(number).chars().collect();
    digits[digits.len().saturating_sub(4)..].iter().collect()
}

/// Brand detection by number prefix, using Stripe.js v2 brand names.
pub(crate) fn card_type(number: &str) -> &'static str {
    let number = digits(number);
    let starts = |prefixes: &[&str]| prefixes.iter().any(|p| number.starts_with(p));

    if starts(&["4"]) {
        "Visa"
    } else if starts(&["34", "37"]) {
        "American Express"
    } else if starts(&["51", "52", "53", "54", "55", "22", "23", "24", "25", "26", "27"]) {
        "MasterCard"
    } else if starts(&["6011", "65", "644", "645", "646", "647", "648", "649", "622"]) {
        "Discover"
    } else if starts(&["300", "301", "302", "303", "304", "305", "36", "38", "39"]) {
        "Diners Club"
    } else if starts(&["35"]) {
        "JCB"
    } else {
        "Unknown"
    }
}

/// Length check plus Luhn checksum.
pub(crate) fn validate_card_number(number: &str) -> bool {
    let number = digits(number);
    if !(10..=19).contains(&number.len()) || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| match (i % 2 == 1, d * 2) {
            (true, doubled) if doubled > 9 => doubled - 9,
            (true, doubled) => doubled,
            (false, _) => d,
        })
        .sum();
    sum % 10 == 0
}

pub(crate) fn validate_cvc(cvc: &str) -> bool {
    let cvc = cvc.trim();
    (3..=4).contains(&cvc.len()) && cvc.bytes().all(|b| b.is_ascii_digit())
}

/// A card stays valid through the end of its expiry month. Two-digit years
/// are read as 20xx.
pub(crate) fn validate_expiry(month: &str, year: &str, today: (u32, u32)) -> bool {
    let (Ok(month), Ok(year)) = (month.trim().parse::<u32>(), year.trim().parse::<u32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }
    let year = if year < 100 { year + 2000 } else { year };
    (year, month) >= today
}

fn current_year_month() -> (u32, u32) {
    let now = Utc::now();
    (now.year() as u32, now.month())
}
