//! Application lock contract client
//!
//! The application contract holds tokens transferred to it from the intents
//! contract (via `mt_transfer_call`) and releases them back on `withdraw_token`.

use std::sync::Arc;

use portal_core::{AccountId, PortalError, Result};
use serde::{Deserialize, Serialize};

use crate::intents::{balance_from_json, is_zero, IntentsClient, WithdrawRequest};
use crate::session::{FunctionCall, Session, TransactionOutcome};

/// A token amount held for an account by the application contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedToken {
    pub token_id: String,
    pub amount: String,
}

/// Result of an unlock-then-withdraw sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockWithdrawOutcome {
    /// Whether `withdraw_token` succeeded; the withdrawal proceeds either way
    pub unlocked: bool,
    /// Amount withdrawn from the intents contract
    pub amount: String,
    pub withdrawal: TransactionOutcome,
}

/// Client for the application lock contract
#[derive(Clone)]
pub struct AppContractClient {
    session: Arc<dyn Session>,
    contract_id: String,
}

impl AppContractClient {
    pub fn new(session: Arc<dyn Session>, contract_id: impl Into<String>) -> Self {
        Self {
            session,
            contract_id: contract_id.into(),
        }
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// Tokens locked for `account`, optionally paginated
    pub async fn get_tokens_for_account(
        &self,
        account: &AccountId,
        from_index: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<LockedToken>> {
        let args = serde_json::json!({
            "account": account.as_str(),
            "from_index": from_index,
            "limit": limit,
        });
        let value = self
            .session
            .view(&self.contract_id, "get_tokens_for_account", args)
            .await?;

        let pairs: Vec<(String, String)> = serde_json::from_value(value)
            .map_err(|e| PortalError::malformed("get_tokens_for_account", e.to_string()))?;

        Ok(pairs
            .into_iter()
            .map(|(token_id, amount)| LockedToken { token_id, amount })
            .collect())
    }

    /// Locked amount of one token for `account`
    pub async fn get_token_balance_for_account(
        &self,
        account: &AccountId,
        token_id: &str,
    ) -> Result<String> {
        let args = serde_json::json!({
            "account": account.as_str(),
            "token_id": token_id,
        });
        let value = self
            .session
            .view(&self.contract_id, "get_token_balance_for_account", args)
            .await?;
        balance_from_json("get_token_balance_for_account", value)
    }

    /// Release the session account's locked balance of `token_id` back to intents
    pub async fn withdraw_token(&self, token_id: &str) -> Result<TransactionOutcome> {
        let call = FunctionCall::new(
            self.contract_id.as_str(),
            "withdraw_token",
            serde_json::json!({ "token_id": token_id }),
        );
        self.session.call(call).await
    }

    /// Unlock a token, then withdraw the full intents balance to `destination`.
    ///
    /// A failed unlock is logged and does not stop the withdrawal; whatever
    /// balance already sits on the intents contract is still withdrawable.
    pub async fn unlock_and_withdraw(
        &self,
        intents: &IntentsClient,
        intents_token_id: &str,
        destination: &str,
    ) -> Result<UnlockWithdrawOutcome> {
        let unlocked = match self.withdraw_token(intents_token_id).await {
            Ok(outcome) => {
                tracing::info!(
                    hash = %outcome.transaction_hash,
                    "Unlocked {} from {}",
                    intents_token_id,
                    self.contract_id
                );
                true
            }
            Err(e) => {
                tracing::warn!("Unlock of {} failed, continuing: {}", intents_token_id, e);
                false
            }
        };

        let amount = intents.mt_balance_of(intents_token_id).await?;
        if is_zero(&amount) {
            return Err(PortalError::contract("No balance available to withdraw"));
        }

        let withdrawal = intents
            .withdraw(&WithdrawRequest {
                intents_token_id: intents_token_id.to_string(),
                amount: amount.clone(),
                destination: destination.to_string(),
            })
            .await?;

        Ok(UnlockWithdrawOutcome {
            unlocked,
            amount,
            withdrawal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::FakeSession;

    fn clients(session: FakeSession) -> (AppContractClient, IntentsClient, Arc<FakeSession>) {
        let session = Arc::new(session);
        (
            AppContractClient::new(session.clone(), "locker.alice.near"),
            IntentsClient::new(session.clone(), "intents.near"),
            session,
        )
    }

    #[tokio::test]
    async fn test_get_tokens_for_account() {
        let (app, _, session) = clients(FakeSession::new("alice.near").with_view(
            "get_tokens_for_account",
            serde_json::json!([["nep141:wrap.near", "1000"], ["nep141:eth.omft.near", "5"]]),
        ));

        let tokens = app
            .get_tokens_for_account(&AccountId::new("alice.near"), None, None)
            .await
            .unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_id, "nep141:wrap.near");
        assert_eq!(tokens[1].amount, "5");

        let views = session.views.lock().unwrap();
        assert_eq!(views[0].0, "locker.alice.near");
        assert_eq!(
            views[0].2,
            serde_json::json!({"account": "alice.near", "from_index": null, "limit": null})
        );
    }

    #[tokio::test]
    async fn test_get_tokens_malformed() {
        let (app, _, _) = clients(
            FakeSession::new("alice.near")
                .with_view("get_tokens_for_account", serde_json::json!({"oops": 1})),
        );
        let err = app
            .get_tokens_for_account(&AccountId::new("alice.near"), Some(0), Some(10))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "malformed_response");
    }

    #[tokio::test]
    async fn test_get_token_balance_for_account() {
        let (app, _, _) = clients(
            FakeSession::new("alice.near")
                .with_view("get_token_balance_for_account", serde_json::json!("77")),
        );
        let balance = app
            .get_token_balance_for_account(&AccountId::new("alice.near"), "nep141:wrap.near")
            .await
            .unwrap();
        assert_eq!(balance, "77");
    }

    #[tokio::test]
    async fn test_withdraw_token_call() {
        let (app, _, session) = clients(FakeSession::new("alice.near"));
        app.withdraw_token("nep141:wrap.near").await.unwrap();

        let call = &session.sent_calls()[0];
        assert_eq!(call.receiver_id, "locker.alice.near");
        assert_eq!(call.method_name, "withdraw_token");
        assert_eq!(call.gas, "100000000000000");
        assert_eq!(call.args, serde_json::json!({"token_id": "nep141:wrap.near"}));
    }

    #[tokio::test]
    async fn test_unlock_and_withdraw() {
        let (app, intents, session) =
            clients(FakeSession::new("alice.near").with_balance("nep141:wrap.near", "900"));

        let outcome = app
            .unlock_and_withdraw(&intents, "nep141:wrap.near", "0xdest")
            .await
            .unwrap();
        assert!(outcome.unlocked);
        assert_eq!(outcome.amount, "900");
        assert_eq!(outcome.withdrawal.transaction_hash, "hash-ft_withdraw");

        let methods: Vec<String> = session
            .sent_calls()
            .into_iter()
            .map(|c| c.method_name)
            .collect();
        assert_eq!(methods, vec!["withdraw_token", "ft_withdraw"]);
    }

    #[tokio::test]
    async fn test_failed_unlock_still_withdraws() {
        let (app, intents, _) = clients(
            FakeSession::new("alice.near")
                .with_balance("nep141:wrap.near", "900")
                .failing("withdraw_token"),
        );

        let outcome = app
            .unlock_and_withdraw(&intents, "nep141:wrap.near", "0xdest")
            .await
            .unwrap();
        assert!(!outcome.unlocked);
        assert_eq!(outcome.amount, "900");
    }

    #[tokio::test]
    async fn test_unlock_and_withdraw_nothing_to_withdraw() {
        let (app, intents, session) = clients(FakeSession::new("alice.near"));

        let err = app
            .unlock_and_withdraw(&intents, "nep141:wrap.near", "0xdest")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Contract error: No balance available to withdraw"
        );
        assert_eq!(session.sent_calls().len(), 1);
    }
}
