//! # NFT Plugin Registrar
//!
//! The NFT voter plugin keeps one registrar per realm and governing mint listing
//! the collections whose NFTs carry voting weight.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::fetcher::AccountFetcher;

/// Anchor account discriminator length.
const DISCRIMINATOR_LEN: usize = 8;

/// A collection the registrar counts toward voting power.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    pub collection: Pubkey,
    pub size: u32,
    pub weight: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftRegistrar {
    pub governance_program_id: Pubkey,
    pub realm: Pubkey,
    pub governing_token_mint: Pubkey,
    pub collection_configs: Vec<CollectionConfig>,
}

impl NftRegistrar {
    /// Collection mints listed in the registrar, in registrar order.
    pub fn collections(&self) -> Vec<Pubkey> {
        self.collection_configs.iter().map(|c| c.collection).collect()
    }
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct CollectionConfigLayout {
    pub collection: [u8; 32],
    pub size: u32,
    pub weight: u64,
    pub reserved: [u8; 8],
}

#[derive(Debug, Clone, BorshSerialize, BorshDeserialize)]
pub struct NftRegistrarLayout {
    pub governance_program_id: [u8; 32],
    pub realm: [u8; 32],
    pub governing_token_mint: [u8; 32],
    pub collection_configs: Vec<CollectionConfigLayout>,
}

/// Decode registrar account data (including the Anchor discriminator).
pub fn decode_nft_registrar(data: &[u8]) -> Option<NftRegistrar> {
    let mut body = data.get(DISCRIMINATOR_LEN..)?;
    let raw = NftRegistrarLayout::deserialize(&mut body).ok()?;

    Some(NftRegistrar {
        governance_program_id: Pubkey::new_from_array(raw.governance_program_id),
        realm: Pubkey::new_from_array(raw.realm),
        governing_token_mint: Pubkey::new_from_array(raw.governing_token_mint),
        collection_configs: raw
            .collection_configs
            .into_iter()
            .map(|c| CollectionConfig {
                collection: Pubkey::new_from_array(c.collection),
                size: c.size,
                weight: c.weight,
            })
            .collect(),
    })
}

/// Fetch the registrar at `address`.
///
/// Returns `None` when the account is missing, unreadable or malformed; the
/// caller then treats the registrar as listing no collections.
pub async fn fetch_nft_registrar(fetcher: &dyn AccountFetcher, address: &Pubkey) -> Option<NftRegistrar> {
    match fetcher.get_account_data(address).await {
        Ok(Some(account)) => {
            let registrar = decode_nft_registrar(&account.data);
            if registrar.is_none() {
                warn!("Registrar {} is malformed, treating it as empty", address);
            }
            registrar
        }
        Ok(None) => {
            debug!("Registrar {} does not exist", address);
            None
        }
        Err(e) => {
            warn!("Failed to fetch registrar {}: {}", address, e);
            None
        }
    }
}
