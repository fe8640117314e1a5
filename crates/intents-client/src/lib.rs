//! intents-client: Intents custody and application lock contract client
//!
//! All contract access goes through a [`Session`] the caller supplies, which
//! carries the account id together with view and call capabilities.

pub mod app_contract;
pub mod intents;
pub mod near_rpc;
pub mod session;

pub use app_contract::{AppContractClient, LockedToken, UnlockWithdrawOutcome};
pub use intents::{lock_call, withdraw_call, IntentsClient, ProbedBalance, WithdrawRequest};
pub use near_rpc::{NearRpcViewer, ViewSession};
pub use session::{FunctionCall, Session, TransactionOutcome};
