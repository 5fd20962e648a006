//! # Plugin Registry
//!
//! Known voter-weight plugin programs, grouped into families. The registry is
//! static and read-only; it is safe to share across concurrent pipelines.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::str::FromStr;

const VSR_PROGRAMS: &[&str] = &[
    "vsr2nfGVNHmSY8uxoBGqq8AQbwz3JwaEaHqGbsTPXqQ",
    "4Q6WW2ouZ6V3iaNm56MTd5n2tnTm4C5fiH8miFHnAFHo",
    "VotEn9AWwTFtJPJSMV5F9jsMY6QwWM5qn3XP9PATGW7",
    "VoteWPk9yyGmkX4U77nEWRJWpcc8kUfrPoghxENpstL",
    "VoteMBhDCqGLRgYpp9o7DGyq81KNmwjXQRAHStjtJsS",
    "5sWzuuYkeWLBdAv3ULrBfqA51zF7Y4rnVzereboNDCPn",
    "HBZ5oXbFBFbr8Krt2oMU7ApHFeukdRS8Rye1f3T66vg5",
];

const NFT_PROGRAMS: &[&str] = &[
    "GnftV5kLjd67tvHpNGyodwWveEKivz3ZWvvE3Z4xi2iw",
    "GnftVc21v2BRchsRa9dGdrVmJPLZiRHe9j2offnFTZFg",
];

const GATEWAY_PROGRAMS: &[&str] = &[
    "Ggatr3wgDLySEwA2qEjt1oiw4BUzp5yMLJyz21919dq6",
    "GgathUhdrCWRHowoRKACjgWhYHfxCEdBi5ViqYN6HVxk",
];

const PYTH_PROGRAMS: &[&str] = &["pytGY6tWRgGinSCvRLnSv4fHfBTMoiDGiCsesmHWM6U"];

/// Voter-weight plugin family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginFamily {
    /// Voter stake registry (locked deposits)
    Vsr,
    /// NFT collection membership
    Nft,
    /// Civic gateway pass
    Gateway,
    /// Pyth staking
    Pyth,
}

/// Order in which families are matched against a configured addin.
///
/// The address sets are disjoint on mainnet but may overlap on staging
/// deployments; the first family that matches with an available client wins.
pub const RESOLUTION_ORDER: [PluginFamily; 4] = [
    PluginFamily::Vsr,
    PluginFamily::Nft,
    PluginFamily::Gateway,
    PluginFamily::Pyth,
];

impl PluginFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginFamily::Vsr => "vsr",
            PluginFamily::Nft => "nft",
            PluginFamily::Gateway => "gateway",
            PluginFamily::Pyth => "pyth",
        }
    }

    /// Base58 program ids belonging to the family.
    pub fn program_ids(&self) -> &'static [&'static str] {
        match self {
            PluginFamily::Vsr => VSR_PROGRAMS,
            PluginFamily::Nft => NFT_PROGRAMS,
            PluginFamily::Gateway => GATEWAY_PROGRAMS,
            PluginFamily::Pyth => PYTH_PROGRAMS,
        }
    }

    pub fn contains(&self, program_id: &Pubkey) -> bool {
        let encoded = program_id.to_string();
        self.program_ids().iter().any(|id| *id == encoded)
    }

    /// Program the family's client is built against.
    pub fn canonical_program_id(&self) -> Option<Pubkey> {
        self.program_ids()
            .first()
            .and_then(|id| Pubkey::from_str(id).ok())
    }

    /// First family, in [`RESOLUTION_ORDER`], whose address set contains `program_id`.
    pub fn classify(program_id: &Pubkey) -> Option<PluginFamily> {
        RESOLUTION_ORDER
            .into_iter()
            .find(|family| family.contains(program_id))
    }
}

impl fmt::Display for PluginFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
