//! Bridge from Stripe.js' `(status, response)` callbacks to futures.
//!
//! [`channel`] hands out a [`TokenCallback`] for the vendor and a receiver the
//! service awaits. The callback settles at most once: the first invocation
//! wins and later ones are ignored.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::channel::oneshot;
use serde_json::Value;

type Settle = Box<dyn FnOnce(u16, Value)>;

/// Completion handle passed to [`StripeVendor::create_token`](crate::vendor::StripeVendor::create_token).
///
/// Cloning shares the same slot, so every clone observes the same
/// single settlement.
#[derive(Clone)]
pub struct TokenCallback {
    slot: Rc<RefCell<Option<Settle>>>,
}

impl TokenCallback {
    pub fn new(settle: impl FnOnce(u16, Value) + 'static) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(Box::new(settle)))),
        }
    }

    /// Deliver the vendor's answer. Returns `false` if already settled.
    pub fn call(&self, status: u16, response: Value) -> bool {
        let settle = self.slot.borrow_mut().take();
        match settle {
            Some(settle) => {
                settle(status, response);
                true
            }
            None => false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.slot.borrow().is_none()
    }
}

impl fmt::Debug for TokenCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCallback")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Receiving half; resolves with `(status, response)` once the callback fires.
pub type TokenReceiver = oneshot::Receiver<(u16, Value)>;

pub fn channel() -> (TokenCallback, TokenReceiver) {
    let (tx, rx) = oneshot::channel();
    let callback = TokenCallback::new(move |status, response| {
        // receiver gone means the caller stopped waiting
        let _ = tx.send((status, response));
    });
    (callback, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn first_call_wins() {
        let (callback, rx) = channel();
        let other = callback.clone();

        assert!(callback.call(200, json!({ "id": "tok_first" })));
        assert!(!other.call(402, json!({ "id": "tok_second" })));
        assert!(other.is_settled());

        let (status, response) = block_on(rx).unwrap();
        assert_eq!(status, 200);
        assert_eq!(response, json!({ "id": "tok_first" }));
    }

    #[test]
    fn dropped_callback_cancels_receiver() {
        let (callback, rx) = channel();
        drop(callback);
        assert!(block_on(rx).is_err());
    }
}
