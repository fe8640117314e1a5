//! portal-api: HTTP API layer for the intents portal
//!
//! Exposes the bridge, the intents contract views and background watches to
//! the frontend. Anything that needs a signature is returned as an unsigned
//! function call for the wallet.

pub mod dto;
pub mod poller;
pub mod routes;
pub mod server;
pub mod state;

pub use poller::{PollStep, Poller, WatchSnapshot};
pub use server::*;
pub use state::{ApiError, AppState};
