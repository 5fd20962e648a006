//! # Account Layouts
//!
//! Borsh layouts of the governance program accounts. Only the leading fields the
//! pipeline needs are declared; trailing bytes are left unread, which keeps the
//! decoders valid across program versions that append fields.
//!
//! Public keys are read as raw `[u8; 32]` and converted afterwards.

use borsh::{BorshDeserialize, BorshSerialize};
use lib_core::{AppError, Result};
use solana_sdk::pubkey::Pubkey;

use super::{
    Governance, GovernanceConfig, GoverningTokenConfig, GoverningTokenType, Realm,
    RealmConfigAccount, TokenOwnerRecord, VoteThreshold,
};

// region: --- Account types
pub const REALM_V1: u8 = 1;
pub const TOKEN_OWNER_RECORD_V1: u8 = 2;
pub const GOVERNANCE_V1: u8 = 3;
pub const PROGRAM_GOVERNANCE_V1: u8 = 4;
pub const MINT_GOVERNANCE_V1: u8 = 9;
pub const TOKEN_GOVERNANCE_V1: u8 = 10;
pub const REALM_CONFIG: u8 = 11;
pub const REALM_V2: u8 = 16;
pub const TOKEN_OWNER_RECORD_V2: u8 = 17;
pub const GOVERNANCE_V2: u8 = 18;
pub const PROGRAM_GOVERNANCE_V2: u8 = 19;
pub const MINT_GOVERNANCE_V2: u8 = 20;
pub const TOKEN_GOVERNANCE_V2: u8 = 21;

const GOVERNANCE_TYPES: [u8; 8] = [
    GOVERNANCE_V1,
    PROGRAM_GOVERNANCE_V1,
    MINT_GOVERNANCE_V1,
    TOKEN_GOVERNANCE_V1,
    GOVERNANCE_V2,
    PROGRAM_GOVERNANCE_V2,
    MINT_GOVERNANCE_V2,
    TOKEN_GOVERNANCE_V2,
];
// endregion: --- Account types

// region: --- Layouts
#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub enum MintMaxVoterWeightSourceLayout {
    SupplyFraction(u64),
    Absolute(u64),
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct RealmInnerConfigLayout {
    pub legacy1: u8,
    pub legacy2: u8,
    pub reserved: [u8; 6],
    pub min_community_weight_to_create_governance: u64,
    pub community_mint_max_voter_weight_source: MintMaxVoterWeightSourceLayout,
    pub council_mint: Option<[u8; 32]>,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct RealmLayout {
    pub account_type: u8,
    pub community_mint: [u8; 32],
    pub config: RealmInnerConfigLayout,
    pub reserved: [u8; 6],
    pub legacy1: u16,
    pub authority: Option<[u8; 32]>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, BorshSerialize, BorshDeserialize)]
pub enum VoteThresholdLayout {
    YesVotePercentage(u8),
    QuorumPercentage(u8),
    Disabled,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct GovernanceConfigLayout {
    pub community_vote_threshold: VoteThresholdLayout,
    pub min_community_weight_to_create_proposal: u64,
    pub min_transaction_hold_up_time: u32,
    pub voting_base_time: u32,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct GovernanceLayout {
    pub account_type: u8,
    pub realm: [u8; 32],
    pub governed_account: [u8; 32],
    /// `proposals_count` in V1, `reserved1` in later versions; clients still read it as the count
    pub proposal_count: u32,
    pub config: GovernanceConfigLayout,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct TokenOwnerRecordLayout {
    pub account_type: u8,
    pub realm: [u8; 32],
    pub governing_token_mint: [u8; 32],
    pub governing_token_owner: [u8; 32],
    pub governing_token_deposit_amount: u64,
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct GoverningTokenConfigLayout {
    pub voter_weight_addin: Option<[u8; 32]>,
    pub max_voter_weight_addin: Option<[u8; 32]>,
    pub token_type: u8,
    pub reserved: [u8; 8],
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct RealmConfigLayout {
    pub account_type: u8,
    pub realm: [u8; 32],
    pub community_token_config: GoverningTokenConfigLayout,
    pub council_token_config: GoverningTokenConfigLayout,
}
// endregion: --- Layouts

// region: --- Decoding
fn read_prefix<T: BorshDeserialize>(data: &[u8], what: &str) -> Result<T> {
    let mut cursor = data;
    T::deserialize(&mut cursor)
        .map_err(|e| AppError::Decoding(format!("Malformed {} account: {}", what, e)))
}

fn expect_type(actual: u8, allowed: &[u8], what: &str) -> Result<()> {
    if allowed.contains(&actual) {
        Ok(())
    } else {
        Err(AppError::Decoding(format!(
            "Account type {} is not a {} account",
            actual, what
        )))
    }
}

fn key(bytes: [u8; 32]) -> Pubkey {
    Pubkey::new_from_array(bytes)
}

pub fn decode_realm(data: &[u8]) -> Result<Realm> {
    let raw: RealmLayout = read_prefix(data, "realm")?;
    expect_type(raw.account_type, &[REALM_V1, REALM_V2], "realm")?;

    Ok(Realm {
        community_mint: key(raw.community_mint),
        council_mint: raw.config.council_mint.map(key),
        min_community_weight_to_create_governance: raw.config.min_community_weight_to_create_governance,
        authority: raw.authority.map(key),
        name: raw.name,
    })
}

pub fn decode_governance(data: &[u8]) -> Result<Governance> {
    let raw: GovernanceLayout = read_prefix(data, "governance")?;
    expect_type(raw.account_type, &GOVERNANCE_TYPES, "governance")?;

    let community_vote_threshold = match raw.config.community_vote_threshold {
        VoteThresholdLayout::YesVotePercentage(p) => VoteThreshold::YesVotePercentage(p),
        VoteThresholdLayout::QuorumPercentage(p) => VoteThreshold::QuorumPercentage(p),
        VoteThresholdLayout::Disabled => VoteThreshold::Disabled,
    };

    Ok(Governance {
        realm: key(raw.realm),
        governed_account: key(raw.governed_account),
        proposal_count: raw.proposal_count,
        config: GovernanceConfig {
            community_vote_threshold,
            min_community_weight_to_create_proposal: raw.config.min_community_weight_to_create_proposal,
            min_transaction_hold_up_time: raw.config.min_transaction_hold_up_time,
            voting_base_time: raw.config.voting_base_time,
        },
    })
}

pub fn decode_token_owner_record(data: &[u8]) -> Result<TokenOwnerRecord> {
    let raw: TokenOwnerRecordLayout = read_prefix(data, "token owner record")?;
    expect_type(
        raw.account_type,
        &[TOKEN_OWNER_RECORD_V1, TOKEN_OWNER_RECORD_V2],
        "token owner record",
    )?;

    Ok(TokenOwnerRecord {
        realm: key(raw.realm),
        governing_token_mint: key(raw.governing_token_mint),
        governing_token_owner: key(raw.governing_token_owner),
        governing_token_deposit_amount: raw.governing_token_deposit_amount,
    })
}

fn token_config(raw: GoverningTokenConfigLayout) -> Result<GoverningTokenConfig> {
    let token_type = match raw.token_type {
        0 => GoverningTokenType::Liquid,
        1 => GoverningTokenType::Membership,
        2 => GoverningTokenType::Dormant,
        other => {
            return Err(AppError::Decoding(format!("Unknown governing token type {}", other)));
        }
    };

    Ok(GoverningTokenConfig {
        voter_weight_addin: raw.voter_weight_addin.map(key),
        max_voter_weight_addin: raw.max_voter_weight_addin.map(key),
        token_type,
        reserved: raw.reserved.to_vec(),
    })
}

pub fn decode_realm_config(data: &[u8]) -> Result<RealmConfigAccount> {
    let raw: RealmConfigLayout = read_prefix(data, "realm config")?;
    expect_type(raw.account_type, &[REALM_CONFIG], "realm config")?;

    Ok(RealmConfigAccount {
        realm: key(raw.realm),
        community_token_config: token_config(raw.community_token_config)?,
        council_token_config: token_config(raw.council_token_config)?,
        reserved: Vec::new(),
    })
}
// endregion: --- Decoding
