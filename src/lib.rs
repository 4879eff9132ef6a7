//! slbnc-admin - Straylight Bouncer admin console
//!
//! A line-oriented console for inspecting and changing bouncer configuration
//! at global, user, network and channel scope.

pub mod config;
pub mod console;
pub mod error;
pub mod router;
pub mod state;
pub mod telemetry;

pub use console::{Console, Session};
pub use error::{ConsoleError, StateError, StoreError};
pub use state::Host;
