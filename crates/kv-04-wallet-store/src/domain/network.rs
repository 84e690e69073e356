//! Beacon chain networks the vault can produce deposits for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target network; selects the genesis fork version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Prater,
    Holesky,
}

impl Network {
    pub fn fork_version(&self) -> [u8; 4] {
        match self {
            Network::Mainnet => [0x00, 0x00, 0x00, 0x00],
            Network::Prater => [0x00, 0x00, 0x10, 0x20],
            Network::Holesky => [0x01, 0x01, 0x70, 0x00],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Prater => "prater",
            Network::Holesky => "holesky",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "prater" | "goerli" => Ok(Network::Prater),
            "holesky" => Ok(Network::Holesky),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}
