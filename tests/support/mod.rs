#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use futures::channel::oneshot;
use futures::future::{self, FutureExt};
use log::{LevelFilter, Log, Metadata, Record};
use yew_stripe_tokens::{LoadError, LoadFuture, ScriptLoader};

/// How a [`RecordingLoader`] answers.
#[derive(Clone, Debug)]
pub enum LoadOutcome {
    Succeed,
    Fail,
    /// Stays pending until [`RecordingLoader::release`].
    Manual,
}

/// Script loader that records the URLs it was asked for.
pub struct RecordingLoader {
    outcome: RefCell<LoadOutcome>,
    urls: RefCell<Vec<String>>,
    manual: RefCell<Vec<oneshot::Sender<Result<(), LoadError>>>>,
}

impl RecordingLoader {
    pub fn new(outcome: LoadOutcome) -> Rc<Self> {
        Rc::new(Self {
            outcome: RefCell::new(outcome),
            urls: RefCell::new(Vec::new()),
            manual: RefCell::new(Vec::new()),
        })
    }

    pub fn succeeding() -> Rc<Self> {
        Self::new(LoadOutcome::Succeed)
    }

    pub fn set_outcome(&self, outcome: LoadOutcome) {
        *self.outcome.borrow_mut() = outcome;
    }

    pub fn calls(&self) -> usize {
        self.urls.borrow().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }

    /// Finish every manual load with `result`.
    pub fn release(&self, result: Result<(), LoadError>) {
        for tx in self.manual.borrow_mut().drain(..) {
            let _ = tx.send(result.clone());
        }
    }
}

impl ScriptLoader for RecordingLoader {
    fn load(&self, url: &str) -> LoadFuture {
        self.urls.borrow_mut().push(url.to_string());
        match &*self.outcome.borrow() {
            LoadOutcome::Succeed => future::ready(Ok(())).boxed_local(),
            LoadOutcome::Fail => future::ready(Err(LoadError::Failed(url.to_string()))).boxed_local(),
            LoadOutcome::Manual => {
                let (tx, rx) = oneshot::channel();
                self.manual.borrow_mut().push(tx);
                let url = url.to_string();
                async move { rx.await.unwrap_or(Err(LoadError::Abandoned(url))) }.boxed_local()
            }
        }
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
}

/// Logger keeping records per test thread.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if CAPTURING.with(Cell::get) {
            CAPTURED.with(|captured| {
                captured
                    .borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }
    }

    fn flush(&self) {}
}

/// Start capturing log records on the current thread, dropping older ones.
pub fn capture_logs() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&CaptureLogger).expect("no other logger in tests");
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURING.with(|capturing| capturing.set(true));
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

pub fn captured_logs() -> Vec<(log::Level, String)> {
    CAPTURED.with(|captured| captured.borrow().clone())
}

pub fn logged(level: log::Level, needle: &str) -> bool {
    captured_logs()
        .iter()
        .any(|(lvl, line)| *lvl == level && line.contains(needle))
}
