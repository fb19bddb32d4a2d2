//! Derivation of IBC voucher denominations.
//!
//! A token that crossed one or more IBC channels is denominated on the
//! receiving chain as `ibc/<HASH>`, where `HASH` is the uppercase hex
//! SHA-256 of its trace `<port>/<channel>/.../<base denom>`. Both ends
//! compute this independently, so the derivation must stay byte-exact.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Error;

pub const IBC_DENOM_PREFIX: &str = "ibc/";

/// one hop of an ibc transfer route
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    pub port_id: String,
    pub channel_id: String,
}

impl PathSegment {
    pub fn new(port_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port_id, self.channel_id)
    }
}

impl FromStr for PathSegment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((port, channel))
                if !port.is_empty() && !channel.is_empty() && !channel.contains('/') =>
            {
                Ok(Self::new(port, channel))
            }
            _ => Err(Error::InvalidPathSegment(s.to_string())),
        }
    }
}

/// Builds the denom trace for `base_denom` after travelling `path`.
///
/// An empty path is accepted and yields `/<base_denom>`.
pub fn denom_trace(path: &[PathSegment], base_denom: &str) -> String {
    let prefix = path
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/");

    format!("{prefix}/{base_denom}")
}

/// Derives the `ibc/<HASH>` denomination of `base_denom` after travelling `path`.
pub fn ibc_denom(path: &[PathSegment], base_denom: &str) -> String {
    let trace = denom_trace(path, base_denom);

    let mut hasher = Sha256::new();
    hasher.update(trace.as_bytes());

    format!("{IBC_DENOM_PREFIX}{}", hex::encode_upper(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer(channel: &str) -> PathSegment {
        PathSegment::new("transfer", channel)
    }

    fn is_well_formed(denom: &str) -> bool {
        denom
            .strip_prefix(IBC_DENOM_PREFIX)
            .map(|hash| {
                hash.len() == 64
                    && hash
                        .chars()
                        .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
            })
            .unwrap_or(false)
    }

    #[test]
    fn single_hop_matches_known_answer() {
        // sha256("transfer/channel-0/uscrt")
        assert_eq!(
            ibc_denom(&[transfer("channel-0")], "uscrt"),
            "ibc/834829648E6B51B21713C76E0C1836727DCE221CE3DC8B3AA7BB11F55428887A"
        );
    }

    #[test]
    fn multi_hop_hashes_the_full_trace() {
        let path = [transfer("channel-1"), transfer("channel-0")];

        assert_eq!(
            denom_trace(&path, "uscrt"),
            "transfer/channel-1/transfer/channel-0/uscrt"
        );
        assert_eq!(
            ibc_denom(&path, "uscrt"),
            "ibc/5832172F7C1B50554FC0092C9BB25B9D64F546DBC08212D596B535937EC1781D"
        );
    }

    #[test]
    fn hop_order_changes_the_denom() {
        let forward = [transfer("channel-0"), transfer("channel-1")];
        let backward = [transfer("channel-1"), transfer("channel-0")];

        assert_ne!(ibc_denom(&forward, "uscrt"), ibc_denom(&backward, "uscrt"));
    }

    #[test]
    fn empty_path_is_permitted() {
        assert_eq!(denom_trace(&[], "uscrt"), "/uscrt");
        assert_eq!(
            ibc_denom(&[], "uscrt"),
            "ibc/EC5F99C743A48B2BFF513AB78AAE7C61F06EA92BCABAA68581B1ED2668C1D4F8"
        );
        assert_ne!(
            ibc_denom(&[], "uscrt"),
            ibc_denom(&[transfer("channel-0")], "uscrt")
        );
    }

    #[test]
    fn derivation_is_deterministic_and_well_formed() {
        let paths = [
            vec![],
            vec![transfer("channel-0")],
            vec![transfer("channel-7"), PathSegment::new("wasm.secret1abc", "channel-3")],
        ];

        for path in &paths {
            for base in ["uscrt", "uatom", "ibc/ABC"] {
                let first = ibc_denom(path, base);
                assert_eq!(first, ibc_denom(path, base));
                assert!(is_well_formed(&first), "malformed denom {first}");
            }
        }
    }

    #[test]
    fn path_segments_parse_from_strings() {
        let segment: PathSegment = "transfer/channel-0".parse().unwrap();
        assert_eq!(segment, transfer("channel-0"));
        assert_eq!(segment.to_string(), "transfer/channel-0");

        for bad in ["transfer", "/channel-0", "transfer/", "a/b/c"] {
            assert!(bad.parse::<PathSegment>().is_err(), "{bad} should not parse");
        }
    }
}
