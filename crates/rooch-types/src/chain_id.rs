use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

pub const LOCAL_CHAIN_ID: u64 = 4;
pub const DEV_CHAIN_ID: u64 = 3;
pub const TEST_CHAIN_ID: u64 = 2;
pub const MAIN_CHAIN_ID: u64 = 1;

/// The networks with a well-known chain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuiltinChainId {
    #[default]
    Local,
    Dev,
    Test,
    Main,
}

impl BuiltinChainId {
    pub const fn chain_id(self) -> u64 {
        match self {
            BuiltinChainId::Local => LOCAL_CHAIN_ID,
            BuiltinChainId::Dev => DEV_CHAIN_ID,
            BuiltinChainId::Test => TEST_CHAIN_ID,
            BuiltinChainId::Main => MAIN_CHAIN_ID,
        }
    }

    pub fn from_chain_id(id: u64) -> Option<Self> {
        match id {
            LOCAL_CHAIN_ID => Some(BuiltinChainId::Local),
            DEV_CHAIN_ID => Some(BuiltinChainId::Dev),
            TEST_CHAIN_ID => Some(BuiltinChainId::Test),
            MAIN_CHAIN_ID => Some(BuiltinChainId::Main),
            _ => None,
        }
    }

    pub fn all() -> [BuiltinChainId; 4] {
        [
            BuiltinChainId::Local,
            BuiltinChainId::Dev,
            BuiltinChainId::Test,
            BuiltinChainId::Main,
        ]
    }
}

impl fmt::Display for BuiltinChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinChainId::Local => write!(f, "local"),
            BuiltinChainId::Dev => write!(f, "dev"),
            BuiltinChainId::Test => write!(f, "test"),
            BuiltinChainId::Main => write!(f, "main"),
        }
    }
}

impl FromStr for BuiltinChainId {
    type Err = TypesError;

    /// Accepts a network name or its numeric chain id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(BuiltinChainId::Local),
            "dev" => Ok(BuiltinChainId::Dev),
            "test" => Ok(BuiltinChainId::Test),
            "main" => Ok(BuiltinChainId::Main),
            other => other
                .parse::<u64>()
                .ok()
                .and_then(BuiltinChainId::from_chain_id)
                .ok_or_else(|| TypesError::Parse(format!("unknown chain {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids() {
        assert_eq!(BuiltinChainId::Local.chain_id(), 4);
        assert_eq!(BuiltinChainId::Dev.chain_id(), 3);
        assert_eq!(BuiltinChainId::Test.chain_id(), 2);
        assert_eq!(BuiltinChainId::Main.chain_id(), 1);
    }

    #[test]
    fn from_chain_id_round_trips() {
        for chain in BuiltinChainId::all() {
            assert_eq!(BuiltinChainId::from_chain_id(chain.chain_id()), Some(chain));
        }
        assert_eq!(BuiltinChainId::from_chain_id(42), None);
    }

    #[test]
    fn parse_names_and_numbers() {
        assert_eq!("main".parse::<BuiltinChainId>().unwrap(), BuiltinChainId::Main);
        assert_eq!("Test".parse::<BuiltinChainId>().unwrap(), BuiltinChainId::Test);
        assert_eq!("3".parse::<BuiltinChainId>().unwrap(), BuiltinChainId::Dev);
        assert!("42".parse::<BuiltinChainId>().is_err());
        assert!("mainnet".parse::<BuiltinChainId>().is_err());
    }

    #[test]
    fn default_is_local() {
        assert_eq!(BuiltinChainId::default(), BuiltinChainId::Local);
        assert_eq!(BuiltinChainId::Local.to_string(), "local");
    }
}
