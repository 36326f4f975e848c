//! The shape of the Stripe.js v2 global, as seen by the service.
//!
//! ```js
//!   Stripe.setPublishableKey(key);
//!   Stripe.card.createToken(data, (status, response) => ...);
//!   Stripe.bankAccount.createToken(data, (status, response) => ...);
//!   Stripe.piiData.createToken(data, (status, response) => ...);
//!   Stripe.card.cardType(number);
//!   Stripe.card.validateCardNumber(number);
//!   Stripe.card.validateCVC(cvc);
//!   Stripe.card.validateExpiry(month, year);
//! ```
//!
//! [`JsStripeVendor`](crate::bindings::JsStripeVendor) talks to the real
//! global, [`StripeMock`](crate::mock::StripeMock) stands in for it offline.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::callback::TokenCallback;

/// Which `Stripe.<namespace>.createToken` a call goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Card,
    BankAccount,
    PiiData,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [TokenKind::Card, TokenKind::BankAccount, TokenKind::PiiData];

    /// Property name on the Stripe global.
    pub fn namespace(self) -> &'static str {
        match self {
            TokenKind::Card => "card",
            TokenKind::BankAccount => "bankAccount",
            TokenKind::PiiData => "piiData",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

/// Optional validation helpers living on `Stripe.card`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardHelper {
    CardType,
    ValidateCardNumber,
    ValidateCvc,
    ValidateExpiry,
}

impl CardHelper {
    pub const ALL: [CardHelper; 4] = [
        CardHelper::CardType,
        CardHelper::ValidateCardNumber,
        CardHelper::ValidateCvc,
        CardHelper::ValidateExpiry,
    ];

    pub fn js_name(self) -> &'static str {
        match self {
            CardHelper::CardType => "cardType",
            CardHelper::ValidateCardNumber => "validateCardNumber",
            CardHelper::ValidateCvc => "validateCVC",
            CardHelper::ValidateExpiry => "validateExpiry",
        }
    }
}

impl fmt::Display for CardHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.js_name())
    }
}

/// A card helper taking positional JSON arguments. `Value::Null` stands for
/// JavaScript's `undefined`.
pub type HelperFn = Rc<dyn Fn(&[Value]) -> Value>;

/// Everything the service needs from Stripe.js.
pub trait StripeVendor {
    fn set_publishable_key(&self, key: &str);

    /// Start a tokenization request. The vendor must eventually invoke
    /// `callback` with the status code and the response object; a vendor
    /// that never does leaves the caller pending forever.
    fn create_token(&self, kind: TokenKind, data: Value, callback: TokenCallback);

    /// The helper, if the vendor exposes it as a function.
    fn card_helper(&self, helper: CardHelper) -> Option<HelperFn>;
}
