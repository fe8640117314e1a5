//! Supported-token catalog
//!
//! Built from the bridge's `supported_tokens` result. A single asset (e.g. USDC)
//! appears once per chain it can be deposited from.

use std::collections::HashSet;

use portal_core::AssetIdentifier;
use serde::{Deserialize, Serialize};

use crate::types::TokenDescriptor;

/// All tokens the bridge supports, unique by asset identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenCatalog {
    pub tokens: Vec<TokenDescriptor>,
}

impl TokenCatalog {
    /// Build a catalog, keeping the first occurrence of each asset identifier
    pub fn from_tokens(tokens: Vec<TokenDescriptor>) -> Self {
        let total = tokens.len();
        let mut seen: HashSet<AssetIdentifier> = HashSet::with_capacity(total);
        let mut unique: Vec<TokenDescriptor> = Vec::with_capacity(total);

        for token in tokens {
            if !seen.insert(token.defuse_asset_identifier.clone()) {
                tracing::warn!("Found duplicate: {}", token.defuse_asset_identifier);
                continue;
            }
            unique.push(token);
        }

        if unique.len() < total {
            tracing::info!(
                total,
                unique = unique.len(),
                "Removed {} duplicate tokens",
                total - unique.len()
            );
        }

        Self { tokens: unique }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Unique asset names in first-seen order
    pub fn asset_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if !names.contains(&token.asset_name.as_str()) {
                names.push(&token.asset_name);
            }
        }
        names
    }

    /// Every chain variant of an asset
    pub fn chains_for_asset(&self, asset_name: &str) -> Vec<&TokenDescriptor> {
        self.tokens
            .iter()
            .filter(|t| t.asset_name == asset_name)
            .collect()
    }

    pub fn find_by_identifier(&self, identifier: &str) -> Option<&TokenDescriptor> {
        self.tokens
            .iter()
            .find(|t| t.defuse_asset_identifier.as_str() == identifier)
    }

    /// Look up by NEAR token id; a `nep141:` prefix is ignored
    pub fn find_by_near_token_id(&self, token_id: &str) -> Option<&TokenDescriptor> {
        let near_id = token_id.strip_prefix("nep141:").unwrap_or(token_id);
        self.tokens.iter().find(|t| t.near_token_id == near_id)
    }

    pub fn find_by_intents_token_id(&self, token_id: &str) -> Option<&TokenDescriptor> {
        self.tokens.iter().find(|t| t.intents_token_id == token_id)
    }
}
