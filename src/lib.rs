mod bindings;
mod bootstrap;
mod callback;
mod components;
mod config;
mod error;
mod loader;
mod logging;
mod mock;
pub mod params;
mod response;
mod service;
mod vendor;
mod waiter;

pub use bindings::*;
pub use bootstrap::*;
pub use callback::{channel as token_channel, TokenCallback, TokenReceiver};
pub use components::*;
pub use config::*;
pub use error::*;
pub use loader::*;
pub use logging::*;
pub use mock::{StripeMock, TokenRequest};
pub use response::*;
pub use service::*;
pub use vendor::*;
pub use waiter::PendingWaiter;
