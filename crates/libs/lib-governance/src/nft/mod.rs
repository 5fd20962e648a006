//! # NFT Voting Eligibility
//!
//! For realms governed by the NFT voter plugin, a voter's weight comes from the
//! NFTs they hold in collections the plugin's registrar lists. This module
//! fetches the voter's NFTs and keeps the ones that qualify.
//!
//! An NFT qualifies when all of the following hold:
//! - it declares a collection with a mint address
//! - that collection is listed in the registrar
//! - the collection is verified, or carries no verification flag at all
//!   (older metadata never set one)
//! - at least one of its creators is verified

pub mod das;
pub mod registrar;

use async_trait::async_trait;
use lib_core::Cluster;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::accounts::pda::registrar_address;
use crate::fetcher::AccountFetcher;
use crate::plugins::PluginClient;

pub use das::DasNftSource;
pub use registrar::{fetch_nft_registrar, NftRegistrar};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCreator {
    pub address: Pubkey,
    pub verified: bool,
    pub share: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCollection {
    pub mint_address: Option<Pubkey>,
    /// `None` when the metadata predates collection verification
    pub verified: Option<bool>,
}

/// An NFT held by a voter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nft {
    pub mint: Pubkey,
    pub name: String,
    pub collection: Option<NftCollection>,
    pub creators: Vec<NftCreator>,
}

/// Source of the NFTs a wallet holds.
#[async_trait]
pub trait NftSource: Send + Sync {
    async fn get_nfts(&self, owner: &Pubkey, cluster: Cluster) -> anyhow::Result<Vec<Nft>>;
}

/// Whether `nft` counts toward voting power given the registrar's collections.
pub fn is_eligible(nft: &Nft, collections: &[Pubkey]) -> bool {
    let Some(collection) = &nft.collection else {
        return false;
    };
    let Some(mint) = collection.mint_address else {
        return false;
    };

    collection.verified.unwrap_or(true)
        && collections.contains(&mint)
        && nft.creators.iter().any(|c| c.verified)
}

/// Keep the NFTs that count toward voting power, preserving input order.
pub fn filter_eligible(nfts: Vec<Nft>, collections: &[Pubkey]) -> Vec<Nft> {
    nfts.into_iter()
        .filter(|nft| is_eligible(nft, collections))
        .collect()
}

/// Evaluates a voter's NFTs against the NFT plugin's registrar.
pub struct NftEligibilityEvaluator<'a> {
    pub fetcher: &'a dyn AccountFetcher,
    pub source: &'a dyn NftSource,
    pub cluster: Cluster,
}

impl<'a> NftEligibilityEvaluator<'a> {
    /// NFTs of `voter` that count toward voting power in `realm`.
    ///
    /// Registrar and NFT-source failures are logged and yield an empty set.
    pub async fn eligible_nfts(
        &self,
        realm: &Pubkey,
        community_mint: &Pubkey,
        plugin: &dyn PluginClient,
        voter: &Pubkey,
    ) -> Vec<Nft> {
        let registrar_pda = registrar_address(realm, community_mint, &plugin.program_id());

        let collections = fetch_nft_registrar(self.fetcher, &registrar_pda)
            .await
            .map(|registrar| registrar.collections())
            .unwrap_or_default();
        debug!("Registrar {} lists {} collection(s)", registrar_pda, collections.len());

        let nfts = match self.source.get_nfts(voter, self.cluster).await {
            Ok(nfts) => nfts,
            Err(e) => {
                warn!("Failed to fetch NFTs for {}: {}", voter, e);
                Vec::new()
            }
        };

        let held = nfts.len();
        let eligible = filter_eligible(nfts, &collections);
        info!("{} of {} NFT(s) held by {} count toward voting power", eligible.len(), held, voter);

        eligible
    }
}
