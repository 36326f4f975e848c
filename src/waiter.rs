//! In-flight tokenization tracking.
//!
//! [`PendingCounter`] counts calls between issue and settlement. Tests use a
//! [`PendingWaiter`] to wait until nothing is outstanding.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use futures::channel::oneshot;

#[derive(Default)]
pub(crate) struct PendingCounter {
    count: Cell<usize>,
    idle: RefCell<Vec<oneshot::Sender<()>>>,
}

impl PendingCounter {
    pub(crate) fn count(&self) -> usize {
        self.count.get()
    }

    /// Count a call as in flight until the returned guard drops.
    pub(crate) fn begin(self: &Rc<Self>) -> PendingCall {
        self.count.set(self.count.get() + 1);
        PendingCall {
            counter: Rc::clone(self),
        }
    }

    fn finish(&self) {
        let remaining = self.count.get().saturating_sub(1);
        self.count.set(remaining);
        if remaining == 0 {
            let waiters = std::mem::take(&mut *self.idle.borrow_mut());
            for waiter in waiters {
                let _ = waiter.send(());
            }
        }
    }
}

/// Keeps one call counted; decrements on drop.
pub(crate) struct PendingCall {
    counter: Rc<PendingCounter>,
}

impl Drop for PendingCall {
    fn drop(&mut self) {
        self.counter.finish();
    }
}

/// Test hook: observe or await the drain of in-flight tokenization calls.
///
/// A call whose vendor callback never fires stays counted, so
/// [`idle`](Self::idle) never resolves in that case.
#[derive(Clone)]
pub struct PendingWaiter {
    counter: Rc<PendingCounter>,
}

impl PendingWaiter {
    pub(crate) fn new(counter: Rc<PendingCounter>) -> Self {
        Self { counter }
    }

    pub fn pending(&self) -> usize {
        self.counter.count()
    }

    pub fn is_idle(&self) -> bool {
        self.counter.count() == 0
    }

    /// Resolves once no call is in flight.
    pub async fn idle(&self) {
        if self.is_idle() {
            return;
        }
        let (tx, rx) = oneshot::channel();
        self.counter.idle.borrow_mut().push(tx);
        let _ = rx.await;
    }
}

impl fmt::Debug for PendingWaiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWaiter")
            .field("pending", &self.pending())
            .finish()
    }
}
