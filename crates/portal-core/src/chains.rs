//! Chain display names

/// EVM chains the bridge exposes under the `eth` namespace
const EVM_CHAINS: &[(&str, &str)] = &[
    ("eth:1", "Ethereum"),
    ("eth:42161", "Arbitrum One"),
    ("eth:56", "BNB Smart Chain"),
    ("eth:8453", "Base"),
    ("eth:100", "Gnosis"),
    ("eth:137", "Polygon"),
    ("eth:80094", "Berachain"),
];

/// Display name for a `<namespace>:<ref>` chain id.
///
/// `*:mainnet` ids resolve to their uppercased namespace (`sol` is spelled
/// out as "Solana"). Unknown ids are returned unchanged.
pub fn chain_display_name(chain_id: &str) -> String {
    if chain_id.ends_with(":mainnet") {
        let name = chain_id
            .split(':')
            .next()
            .unwrap_or_default()
            .to_uppercase();
        if name == "SOL" {
            return "Solana".to_string();
        }
        return name;
    }

    EVM_CHAINS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| chain_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_chains() {
        assert_eq!(chain_display_name("sol:mainnet"), "Solana");
        assert_eq!(chain_display_name("btc:mainnet"), "BTC");
        assert_eq!(chain_display_name("near:mainnet"), "NEAR");
    }

    #[test]
    fn test_evm_chains() {
        assert_eq!(chain_display_name("eth:1"), "Ethereum");
        assert_eq!(chain_display_name("eth:42161"), "Arbitrum One");
        assert_eq!(chain_display_name("eth:56"), "BNB Smart Chain");
        assert_eq!(chain_display_name("eth:8453"), "Base");
        assert_eq!(chain_display_name("eth:100"), "Gnosis");
        assert_eq!(chain_display_name("eth:137"), "Polygon");
        assert_eq!(chain_display_name("eth:80094"), "Berachain");
    }

    #[test]
    fn test_unknown_passthrough() {
        assert_eq!(chain_display_name("xyz:9"), "xyz:9");
        assert_eq!(chain_display_name("eth:10"), "eth:10");
        assert_eq!(chain_display_name(""), "");
    }
}
