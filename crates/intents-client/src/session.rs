//! Wallet session capability
//!
//! A session bundles the signed-in account with the ability to run view calls
//! and submit function calls. Callers hand it to the contract clients
//! explicitly; nothing here reaches for ambient wallet state.

use async_trait::async_trait;
use portal_core::constants::{CALL_GAS, ONE_YOCTO};
use portal_core::{AccountId, Result};
use serde::{Deserialize, Serialize};

/// A single function-call action, in the shape wallets accept.
///
/// Gas and deposit are decimal strings because deposits are yoctoNEAR `u128`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCall {
    pub receiver_id: String,
    pub method_name: String,
    pub args: serde_json::Value,
    pub gas: String,
    pub deposit: String,
}

impl FunctionCall {
    /// Call with the standard gas allotment and no deposit
    pub fn new(
        receiver_id: impl Into<String>,
        method_name: impl Into<String>,
        args: serde_json::Value,
    ) -> Self {
        Self {
            receiver_id: receiver_id.into(),
            method_name: method_name.into(),
            args,
            gas: CALL_GAS.to_string(),
            deposit: "0".to_string(),
        }
    }

    /// Attach the 1 yoctoNEAR deposit required by intents transfers and withdrawals
    pub fn with_one_yocto(mut self) -> Self {
        self.deposit = ONE_YOCTO.to_string();
        self
    }
}

/// What the wallet reports after a transaction was sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub transaction_hash: String,
}

/// Signed-in account plus view/call capability
#[async_trait]
pub trait Session: Send + Sync {
    fn account_id(&self) -> &AccountId;

    /// Read-only contract call; returns the method's JSON result
    async fn view(
        &self,
        contract_id: &str,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Sign and send a function call
    async fn call(&self, call: FunctionCall) -> Result<TransactionOutcome>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use portal_core::PortalError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Session answering `mt_balance_of` and friends from fixed tables
    pub struct FakeSession {
        pub account: AccountId,
        /// token_id -> balance for `mt_balance_of`
        pub balances: HashMap<String, String>,
        /// method -> canned view result for everything else
        pub view_results: HashMap<String, serde_json::Value>,
        /// methods whose calls fail
        pub failing_calls: Vec<String>,
        pub views: Mutex<Vec<(String, String, serde_json::Value)>>,
        pub calls: Mutex<Vec<FunctionCall>>,
    }

    impl FakeSession {
        pub fn new(account: &str) -> Self {
            Self {
                account: AccountId::new(account),
                balances: HashMap::new(),
                view_results: HashMap::new(),
                failing_calls: Vec::new(),
                views: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_balance(mut self, token_id: &str, amount: &str) -> Self {
            self.balances.insert(token_id.to_string(), amount.to_string());
            self
        }

        pub fn with_view(mut self, method: &str, result: serde_json::Value) -> Self {
            self.view_results.insert(method.to_string(), result);
            self
        }

        pub fn failing(mut self, method: &str) -> Self {
            self.failing_calls.push(method.to_string());
            self
        }

        pub fn viewed_token_ids(&self) -> Vec<String> {
            self.views
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, method, _)| method == "mt_balance_of")
                .map(|(_, _, args)| args["token_id"].as_str().unwrap_or_default().to_string())
                .collect()
        }

        pub fn sent_calls(&self) -> Vec<FunctionCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Session for FakeSession {
        fn account_id(&self) -> &AccountId {
            &self.account
        }

        async fn view(
            &self,
            contract_id: &str,
            method: &str,
            args: serde_json::Value,
        ) -> Result<serde_json::Value> {
            self.views.lock().unwrap().push((
                contract_id.to_string(),
                method.to_string(),
                args.clone(),
            ));

            if method == "mt_balance_of" {
                let token_id = args["token_id"].as_str().unwrap_or_default();
                let balance = self.balances.get(token_id).cloned().unwrap_or_else(|| "0".to_string());
                return Ok(serde_json::Value::String(balance));
            }

            self.view_results
                .get(method)
                .cloned()
                .ok_or_else(|| PortalError::contract(format!("MethodNotFound: {}", method)))
        }

        async fn call(&self, call: FunctionCall) -> Result<TransactionOutcome> {
            let method = call.method_name.clone();
            self.calls.lock().unwrap().push(call);
            if self.failing_calls.contains(&method) {
                return Err(PortalError::contract(format!("{} failed", method)));
            }
            Ok(TransactionOutcome {
                transaction_hash: format!("hash-{}", method),
            })
        }
    }
}
