//! # Proposal Assembler Steps
//!
//! The individual decisions the pipeline makes before submission: which token
//! owner record acts for the voter, and which realm configuration applies.

use lib_core::{AppError, Result};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::accounts::layout::decode_realm_config;
use crate::accounts::pda::realm_config_address;
use crate::accounts::{ProgramAccount, RealmConfigAccount, TokenOwnerRecord};
use crate::fetcher::AccountFetcher;

/// Maximum proposal title length in bytes.
pub const MAX_TITLE_LEN: usize = 130;

/// Reject titles the governance UI cannot display.
pub fn validate_title(title: &str) -> Result<()> {
    lib_utils::validate_not_empty(title, "Proposal title").map_err(AppError::InvalidInput)?;
    lib_utils::validate_max_length(title, MAX_TITLE_LEN, "Proposal title").map_err(AppError::InvalidInput)
}

/// Token owner record for an optional lookup.
///
/// A transport failure is logged and treated like a missing record.
pub async fn optional_token_owner_record(
    fetcher: &dyn AccountFetcher,
    program_id: &Pubkey,
    realm: &Pubkey,
    governing_token_mint: Option<&Pubkey>,
    owner: &Pubkey,
) -> Option<ProgramAccount<TokenOwnerRecord>> {
    let mint = governing_token_mint?;

    match fetcher.get_token_owner_record(program_id, realm, mint, owner).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Token owner record lookup for mint {} failed, treating as absent: {}", mint, e);
            None
        }
    }
}

/// Record that acts for the voter: the requested mint's, then community, then council.
pub fn select_acting_record(
    requested: Option<ProgramAccount<TokenOwnerRecord>>,
    community: Option<ProgramAccount<TokenOwnerRecord>>,
    council: Option<ProgramAccount<TokenOwnerRecord>>,
) -> Result<ProgramAccount<TokenOwnerRecord>> {
    requested.or(community).or(council).ok_or(AppError::NoVotingPower)
}

/// Realm config of `realm`, or the default config when the realm never created one.
///
/// A failed lookup is fatal.
pub async fn load_realm_config(
    fetcher: &dyn AccountFetcher,
    program_id: &Pubkey,
    realm: &Pubkey,
) -> Result<RealmConfigAccount> {
    let address = realm_config_address(program_id, realm);

    let account = fetcher
        .get_account_data(&address)
        .await
        .map_err(|e| AppError::Precondition(format!("Failed to fetch realm config {}: {}", address, e)))?;

    match account {
        Some(raw) => decode_realm_config(&raw.data),
        None => {
            debug!("Realm {} has no config account, using defaults", realm);
            Ok(RealmConfigAccount::default_for(*realm))
        }
    }
}
