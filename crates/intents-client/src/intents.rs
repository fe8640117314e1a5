//! Intents custody contract client
//!
//! Balances on the intents contract are keyed by compound token ids:
//! `nep141:<ft contract>` or `nep245:<mt contract>:<token id>`.

use std::sync::Arc;

use portal_core::constants::WITHDRAW_MEMO_PREFIX;
use portal_core::{AccountId, PortalError, Result, TokenStandard};
use serde::{Deserialize, Serialize};

use crate::session::{FunctionCall, Session, TransactionOutcome};

/// Balance found by the dual-standard probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbedBalance {
    /// Base-unit amount
    pub balance: String,
    /// Standard the balance was found under; `None` when both were zero
    pub standard: Option<TokenStandard>,
}

/// A withdrawal from the intents contract to an external chain address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawRequest {
    /// Compound intents token id (`nep141:...` or `nep245:...`)
    pub intents_token_id: String,
    /// Base-unit amount
    pub amount: String,
    /// Destination address on the target chain
    pub destination: String,
}

/// Client for the intents custody contract
#[derive(Clone)]
pub struct IntentsClient {
    session: Arc<dyn Session>,
    contract_id: String,
}

impl IntentsClient {
    pub fn new(session: Arc<dyn Session>, contract_id: impl Into<String>) -> Self {
        Self {
            session,
            contract_id: contract_id.into(),
        }
    }

    pub fn account_id(&self) -> &AccountId {
        self.session.account_id()
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// Raw `mt_balance_of` for the session account
    pub async fn mt_balance_of(&self, token_id: &str) -> Result<String> {
        let args = serde_json::json!({
            "account_id": self.session.account_id().as_str(),
            "token_id": token_id,
        });
        let value = self
            .session
            .view(&self.contract_id, "mt_balance_of", args)
            .await?;
        balance_from_json("mt_balance_of", value)
    }

    /// Balance of an underlying token, trying NEP-141 then NEP-245.
    ///
    /// A zero under `nep141:` is not trusted until `nep245:` has been asked too.
    pub async fn balance_of(&self, token_ref: &str) -> Result<ProbedBalance> {
        let nep141 = self
            .mt_balance_of(&TokenStandard::Nep141.intents_token_id(token_ref))
            .await?;
        if !is_zero(&nep141) {
            return Ok(ProbedBalance {
                balance: nep141,
                standard: Some(TokenStandard::Nep141),
            });
        }

        let nep245 = self
            .mt_balance_of(&TokenStandard::Nep245.intents_token_id(token_ref))
            .await?;
        if !is_zero(&nep245) {
            return Ok(ProbedBalance {
                balance: nep245,
                standard: Some(TokenStandard::Nep245),
            });
        }

        Ok(ProbedBalance {
            balance: "0".to_string(),
            standard: None,
        })
    }

    /// Submit a withdrawal. The returned hash keys withdrawal-status polling.
    pub async fn withdraw(&self, request: &WithdrawRequest) -> Result<TransactionOutcome> {
        let call = withdraw_call(&self.contract_id, request)?;
        tracing::info!(
            account = %self.session.account_id(),
            token = %request.intents_token_id,
            amount = %request.amount,
            "Submitting {}",
            call.method_name
        );
        self.session.call(call).await
    }

    /// Move the whole intents balance of a token into the application contract
    pub async fn lock_in_contract(
        &self,
        intents_token_id: &str,
        receiver_id: &str,
    ) -> Result<TransactionOutcome> {
        let balance = self.mt_balance_of(intents_token_id).await?;
        let call = lock_call(&self.contract_id, intents_token_id, receiver_id, &balance)?;
        tracing::info!(
            account = %self.session.account_id(),
            token = %intents_token_id,
            amount = %balance,
            "Locking funds in {}",
            receiver_id
        );
        self.session.call(call).await
    }
}

/// Build the `ft_withdraw` / `mt_withdraw` call for a withdrawal
pub fn withdraw_call(contract_id: &str, request: &WithdrawRequest) -> Result<FunctionCall> {
    let destination = request.destination.trim();
    if destination.is_empty() {
        return Err(PortalError::parse(
            &request.destination,
            "destination address cannot be empty",
        ));
    }
    if request.amount.is_empty() || !request.amount.chars().all(|c| c.is_ascii_digit()) {
        return Err(PortalError::parse(&request.amount, "amount must be base units"));
    }
    if is_zero(&request.amount) {
        return Err(PortalError::contract("No balance available to withdraw"));
    }

    let memo = format!("{}{}", WITHDRAW_MEMO_PREFIX, destination);

    let (standard, token_ref) = TokenStandard::from_intents_token_id(&request.intents_token_id)
        .ok_or_else(|| {
            PortalError::parse(&request.intents_token_id, "missing nep141:/nep245: prefix")
        })?;

    let call = match standard {
        TokenStandard::Nep141 => FunctionCall::new(
            contract_id,
            "ft_withdraw",
            serde_json::json!({
                "token": token_ref,
                "receiver_id": token_ref,
                "amount": request.amount,
                "memo": memo,
            }),
        ),
        TokenStandard::Nep245 => {
            let (token, token_id) = token_ref.split_once(':').ok_or_else(|| {
                PortalError::parse(token_ref, "expected <mt contract>:<token id>")
            })?;
            FunctionCall::new(
                contract_id,
                "mt_withdraw",
                serde_json::json!({
                    "token": token,
                    "receiver_id": token,
                    "token_ids": [token_id],
                    "amounts": [request.amount],
                    "memo": memo,
                }),
            )
        }
    };

    Ok(call.with_one_yocto())
}

/// Build the `mt_transfer_call` that locks `balance` into `receiver_id`
pub fn lock_call(
    contract_id: &str,
    intents_token_id: &str,
    receiver_id: &str,
    balance: &str,
) -> Result<FunctionCall> {
    if is_zero(balance) {
        return Err(PortalError::contract("No balance to lock."));
    }

    Ok(FunctionCall::new(
        contract_id,
        "mt_transfer_call",
        serde_json::json!({
            "receiver_id": receiver_id,
            "amount": balance,
            "msg": "",
            "token_id": intents_token_id,
        }),
    )
    .with_one_yocto())
}

/// Balances come back as JSON strings (`U128`); tolerate bare numbers
pub(crate) fn balance_from_json(method: &str, value: serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) if n.is_u64() => Ok(n.to_string()),
        other => Err(PortalError::malformed(
            method,
            format!("expected balance string, got {}", other),
        )),
    }
}

pub(crate) fn is_zero(amount: &str) -> bool {
    amount.is_empty() || amount.chars().all(|c| c == '0')
}
