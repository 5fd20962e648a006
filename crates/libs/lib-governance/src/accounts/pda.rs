//! # Program Derived Addresses
//!
//! Seeds used by the governance program and the voter-weight plugins.

use solana_sdk::pubkey::Pubkey;

const GOVERNANCE_SEED: &[u8] = b"governance";
const REALM_CONFIG_SEED: &[u8] = b"realm-config";
const REGISTRAR_SEED: &[u8] = b"registrar";
const VOTER_WEIGHT_RECORD_SEED: &[u8] = b"voter-weight-record";

/// Realm config account of `realm`.
pub fn realm_config_address(program_id: &Pubkey, realm: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[REALM_CONFIG_SEED, realm.as_ref()], program_id).0
}

/// Token owner record of `owner` for `governing_token_mint` in `realm`.
pub fn token_owner_record_address(
    program_id: &Pubkey,
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    owner: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[
            GOVERNANCE_SEED,
            realm.as_ref(),
            governing_token_mint.as_ref(),
            owner.as_ref(),
        ],
        program_id,
    )
    .0
}

/// Plugin registrar for `realm` and `governing_token_mint`, owned by `plugin_program_id`.
pub fn registrar_address(
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    plugin_program_id: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[REGISTRAR_SEED, realm.as_ref(), governing_token_mint.as_ref()],
        plugin_program_id,
    )
    .0
}

/// Voter weight record a plugin maintains for `owner`.
pub fn voter_weight_record_address(
    realm: &Pubkey,
    governing_token_mint: &Pubkey,
    owner: &Pubkey,
    plugin_program_id: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[
            VOTER_WEIGHT_RECORD_SEED,
            realm.as_ref(),
            governing_token_mint.as_ref(),
            owner.as_ref(),
        ],
        plugin_program_id,
    )
    .0
}

/// Voter-stake-registry registrar. VSR puts the realm ahead of the seed tag.
pub fn vsr_registrar_address(realm: &Pubkey, governing_token_mint: &Pubkey, vsr_program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[realm.as_ref(), REGISTRAR_SEED, governing_token_mint.as_ref()],
        vsr_program_id,
    )
    .0
}

/// Voter weight record VSR keeps for `voter` under `registrar`.
pub fn vsr_voter_weight_record_address(registrar: &Pubkey, voter: &Pubkey, vsr_program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[registrar.as_ref(), VOTER_WEIGHT_RECORD_SEED, voter.as_ref()],
        vsr_program_id,
    )
    .0
}

/// Proposal address seeded by its index (governance program V2 scheme).
pub fn proposal_address(
    program_id: &Pubkey,
    governance: &Pubkey,
    governing_token_mint: &Pubkey,
    proposal_index: u32,
) -> Pubkey {
    Pubkey::find_program_address(
        &[
            GOVERNANCE_SEED,
            governance.as_ref(),
            governing_token_mint.as_ref(),
            &proposal_index.to_le_bytes(),
        ],
        program_id,
    )
    .0
}
