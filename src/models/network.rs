use serde::Serialize;
use std::fmt;

/// Upstream chains the gateway can talk to.
///
/// `Unknown` is only ever produced by [`Network::resolve`] for names outside
/// the supported set; request validation rejects it and no upstream client
/// is ever registered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Avalanche,
    Ethereum,
    Unknown,
}

impl Network {
    /// Networks that can be selected by a request
    pub const SUPPORTED: [Network; 2] = [Network::Avalanche, Network::Ethereum];

    /// Map a request's network name onto a known network.
    ///
    /// Matching is exact: no trimming, no case folding, no aliases.
    pub fn resolve(name: &str) -> Network {
        match name {
            "avalanche" => Network::Avalanche,
            "ethereum" => Network::Ethereum,
            _ => Network::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Network::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Avalanche => "avalanche",
            Network::Ethereum => "ethereum",
            Network::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_supported_names() {
        assert_eq!(Network::resolve("avalanche"), Network::Avalanche);
        assert_eq!(Network::resolve("ethereum"), Network::Ethereum);
    }

    #[test]
    fn test_resolve_is_exact() {
        for name in ["", "Avalanche", "ETHEREUM", " ethereum", "ethereum ", "eth", "avax", "polygon", "unknown"] {
            assert_eq!(Network::resolve(name), Network::Unknown, "name {:?}", name);
        }
    }

    #[test]
    fn test_supported_round_trip_through_names() {
        for network in Network::SUPPORTED {
            assert!(network.is_known());
            assert_eq!(Network::resolve(network.as_str()), network);
        }
        assert!(!Network::Unknown.is_known());
    }

    #[test]
    fn test_network_serialization() {
        assert_eq!(serde_json::to_string(&Network::Avalanche).unwrap(), "\"avalanche\"");
        assert_eq!(Network::Ethereum.to_string(), "ethereum");
    }
}
