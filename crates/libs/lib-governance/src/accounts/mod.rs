//! # Governance Accounts
//!
//! Typed views of the SPL governance accounts the proposal pipeline reads.
//! Raw byte layouts live in [`layout`]; account addresses in [`pda`].

pub mod layout;
pub mod pda;

use solana_sdk::pubkey::Pubkey;

/// An account decoded from the ledger together with its address and owner program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAccount<T> {
    pub pubkey: Pubkey,
    pub owner: Pubkey,
    pub account: T,
}

/// Realm (the DAO itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Realm {
    pub community_mint: Pubkey,
    pub council_mint: Option<Pubkey>,
    pub min_community_weight_to_create_governance: u64,
    pub authority: Option<Pubkey>,
    pub name: String,
}

/// Vote threshold of a governance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteThreshold {
    YesVotePercentage(u8),
    QuorumPercentage(u8),
    Disabled,
}

/// Leading fields of a governance's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceConfig {
    pub community_vote_threshold: VoteThreshold,
    pub min_community_weight_to_create_proposal: u64,
    /// Minimum seconds between a proposal passing and its instructions executing
    pub min_transaction_hold_up_time: u32,
    pub voting_base_time: u32,
}

/// Governance a proposal is created against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Governance {
    pub realm: Pubkey,
    pub governed_account: Pubkey,
    /// Running proposal count; the next proposal's index
    pub proposal_count: u32,
    pub config: GovernanceConfig,
}

/// A voter's deposit record for one governing mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOwnerRecord {
    pub realm: Pubkey,
    pub governing_token_mint: Pubkey,
    pub governing_token_owner: Pubkey,
    pub governing_token_deposit_amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoverningTokenType {
    #[default]
    Liquid,
    Membership,
    Dormant,
}

/// Per-mint voter-weight configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoverningTokenConfig {
    /// Voter-weight plugin program, if any
    pub voter_weight_addin: Option<Pubkey>,
    pub max_voter_weight_addin: Option<Pubkey>,
    pub token_type: GoverningTokenType,
    pub reserved: Vec<u8>,
}

/// Realm-level plugin configuration for both governing mints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmConfigAccount {
    pub realm: Pubkey,
    pub community_token_config: GoverningTokenConfig,
    pub council_token_config: GoverningTokenConfig,
    pub reserved: Vec<u8>,
}

impl RealmConfigAccount {
    /// Configuration the governance program assumes when a realm never created
    /// a config account: liquid tokens, no plugins.
    pub fn default_for(realm: Pubkey) -> Self {
        Self {
            realm,
            community_token_config: GoverningTokenConfig::default(),
            council_token_config: GoverningTokenConfig::default(),
            reserved: Vec::new(),
        }
    }
}
