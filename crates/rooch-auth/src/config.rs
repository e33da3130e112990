//! Which Bitcoin network each builtin chain expects.
//!
//! | chain | id | Bitcoin network |
//! |-------|----|-----------------|
//! | local | 4  | regtest         |
//! | dev   | 3  | regtest         |
//! | test  | 2  | testnet         |
//! | main  | 1  | mainnet         |

use chain_btc::BtcNetwork;
use rooch_types::chain_id::BuiltinChainId;

use crate::authenticator::{BitcoinAuthOptions, SignMode};
use crate::error::AuthError;

pub const fn bitcoin_network(chain: BuiltinChainId) -> BtcNetwork {
    match chain {
        BuiltinChainId::Local | BuiltinChainId::Dev => BtcNetwork::Regtest,
        BuiltinChainId::Test => BtcNetwork::Testnet,
        BuiltinChainId::Main => BtcNetwork::Mainnet,
    }
}

pub fn bitcoin_network_for_chain_id(chain_id: u64) -> Result<BtcNetwork, AuthError> {
    BuiltinChainId::from_chain_id(chain_id)
        .map(bitcoin_network)
        .ok_or_else(|| AuthError::Validation(format!("unknown chain id {chain_id}")))
}

/// Bitcoin authenticator options for a transaction on `chain_id`, signing
/// in [`SignMode::Hash`].
pub fn bitcoin_auth_options(
    chain_id: u64,
    message_info: &str,
) -> Result<BitcoinAuthOptions, AuthError> {
    Ok(BitcoinAuthOptions {
        message_info: message_info.to_string(),
        sign_mode: SignMode::Hash,
        network: bitcoin_network_for_chain_id(chain_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_chain_has_a_network() {
        let expected = [
            (4, BtcNetwork::Regtest),
            (3, BtcNetwork::Regtest),
            (2, BtcNetwork::Testnet),
            (1, BtcNetwork::Mainnet),
        ];
        for (id, network) in expected {
            assert_eq!(bitcoin_network_for_chain_id(id).unwrap(), network);
        }
        for chain in BuiltinChainId::all() {
            assert_eq!(
                bitcoin_network(chain),
                bitcoin_network_for_chain_id(chain.chain_id()).unwrap()
            );
        }
    }

    #[test]
    fn unknown_chain_id() {
        assert!(matches!(
            bitcoin_network_for_chain_id(99),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn options_for_chain() {
        let opts = bitcoin_auth_options(2, "hi").unwrap();
        assert_eq!(opts.network, BtcNetwork::Testnet);
        assert_eq!(opts.sign_mode, SignMode::Hash);
        assert_eq!(opts.message_info, "hi");
    }
}
