//! # Voting Client
//!
//! Binds a realm, the voter and the resolved voter-weight plugin (if any) into
//! the object the submission step uses to account for plugin voting power.

use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::accounts::pda::{vsr_registrar_address, vsr_voter_weight_record_address, voter_weight_record_address};
use crate::accounts::{ProgramAccount, Realm};
use crate::nft::Nft;
use crate::plugins::{PluginClient, PluginFamily, PluginResolution};

/// Voting-power client for one proposal creation.
#[derive(Debug, Clone)]
pub struct VotingClient {
    realm: ProgramAccount<Realm>,
    client: Option<Arc<dyn PluginClient>>,
    wallet: Pubkey,
    current_voter_nfts: Vec<Nft>,
}

impl VotingClient {
    pub fn new(realm: ProgramAccount<Realm>, client: Option<Arc<dyn PluginClient>>, wallet: Pubkey) -> Self {
        Self {
            realm,
            client,
            wallet,
            current_voter_nfts: Vec::new(),
        }
    }

    /// Client for realms without a plugin; base voting power applies.
    pub fn without_plugin(realm: ProgramAccount<Realm>, wallet: Pubkey) -> Self {
        Self::new(realm, None, wallet)
    }

    /// Seed the NFTs the voter votes with.
    pub fn set_current_voter_nfts(&mut self, nfts: Vec<Nft>) {
        self.current_voter_nfts = nfts;
    }

    pub fn current_voter_nfts(&self) -> &[Nft] {
        &self.current_voter_nfts
    }

    /// Hand the seeded NFTs to the submission step, leaving the set empty.
    pub fn take_current_voter_nfts(&mut self) -> Vec<Nft> {
        std::mem::take(&mut self.current_voter_nfts)
    }

    pub fn realm(&self) -> &ProgramAccount<Realm> {
        &self.realm
    }

    pub fn wallet(&self) -> Pubkey {
        self.wallet
    }

    pub fn client(&self) -> Option<&Arc<dyn PluginClient>> {
        self.client.as_ref()
    }

    pub fn plugin_family(&self) -> Option<PluginFamily> {
        self.client.as_ref().map(|c| c.family())
    }

    pub fn is_plugin_active(&self) -> bool {
        self.client.is_some()
    }

    /// Voter weight record the plugin keeps for this voter and `governing_token_mint`.
    ///
    /// Pyth keeps its records under seeds outside this crate, so it has none here.
    pub fn voter_weight_record_address(&self, governing_token_mint: &Pubkey) -> Option<Pubkey> {
        let client = self.client.as_ref()?;
        let program_id = client.program_id();
        let realm = &self.realm.pubkey;

        match client.family() {
            PluginFamily::Vsr => {
                let registrar = vsr_registrar_address(realm, governing_token_mint, &program_id);
                Some(vsr_voter_weight_record_address(&registrar, &self.wallet, &program_id))
            }
            PluginFamily::Nft | PluginFamily::Gateway => Some(voter_weight_record_address(
                realm,
                governing_token_mint,
                &self.wallet,
                &program_id,
            )),
            PluginFamily::Pyth => None,
        }
    }
}

/// Build the voting client for a resolved plugin.
///
/// `eligible_nfts` is only seeded when the NFT plugin is active.
pub fn assemble_voting_client(
    realm: ProgramAccount<Realm>,
    resolution: &PluginResolution,
    voter: Pubkey,
    eligible_nfts: Vec<Nft>,
) -> VotingClient {
    let Some(client) = resolution.client() else {
        debug!("Voting client for {} has no plugin", voter);
        return VotingClient::without_plugin(realm, voter);
    };

    let family = client.family();
    let mut voting_client = VotingClient::new(realm, Some(client), voter);

    if family == PluginFamily::Nft {
        voting_client.set_current_voter_nfts(eligible_nfts);
    } else if !eligible_nfts.is_empty() {
        warn!("Ignoring {} NFT(s) for {} plugin", eligible_nfts.len(), family);
    }

    voting_client
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nft::NftCreator;
    use crate::plugins::PluginProgram;
    use lib_core::Cluster;

    fn realm() -> ProgramAccount<Realm> {
        ProgramAccount {
            pubkey: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            account: Realm {
                community_mint: Pubkey::new_unique(),
                council_mint: None,
                min_community_weight_to_create_governance: 1,
                authority: None,
                name: "Monkey DAO".to_string(),
            },
        }
    }

    fn nft() -> Nft {
        Nft {
            mint: Pubkey::new_unique(),
            name: "SMB #1355".to_string(),
            collection: None,
            creators: vec![NftCreator {
                address: Pubkey::new_unique(),
                verified: true,
                share: 100,
            }],
        }
    }

    fn active(family: PluginFamily) -> PluginResolution {
        PluginResolution::Active(Arc::new(PluginProgram {
            family,
            program_id: family.canonical_program_id().unwrap(),
            cluster: Cluster::Mainnet,
        }))
    }

    #[test]
    fn test_disabled_plugin_yields_null_client() {
        let voter = Pubkey::new_unique();
        let client = assemble_voting_client(realm(), &PluginResolution::Disabled(PluginFamily::Nft), voter, vec![nft()]);

        assert!(!client.is_plugin_active());
        assert!(client.current_voter_nfts().is_empty());
        assert_eq!(client.wallet(), voter);
        assert!(client.voter_weight_record_address(&Pubkey::new_unique()).is_none());
    }

    #[test]
    fn test_nft_plugin_is_seeded_once() {
        let held = vec![nft(), nft()];
        let mut client = assemble_voting_client(realm(), &active(PluginFamily::Nft), Pubkey::new_unique(), held.clone());

        assert_eq!(client.plugin_family(), Some(PluginFamily::Nft));
        assert_eq!(client.current_voter_nfts(), held.as_slice());
        assert_eq!(client.take_current_voter_nfts(), held);
        assert!(client.current_voter_nfts().is_empty());
    }

    #[test]
    fn test_non_nft_plugin_drops_nfts() {
        let client = assemble_voting_client(realm(), &active(PluginFamily::Vsr), Pubkey::new_unique(), vec![nft()]);

        assert_eq!(client.plugin_family(), Some(PluginFamily::Vsr));
        assert!(client.current_voter_nfts().is_empty());
    }

    #[test]
    fn test_voter_weight_record_follows_plugin_seeds() {
        let voter = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let vsr = assemble_voting_client(realm(), &active(PluginFamily::Vsr), voter, Vec::new());
        let vsr_program = PluginFamily::Vsr.canonical_program_id().unwrap();
        let registrar = Pubkey::find_program_address(
            &[vsr.realm().pubkey.as_ref(), b"registrar", mint.as_ref()],
            &vsr_program,
        )
        .0;
        let expected = Pubkey::find_program_address(
            &[registrar.as_ref(), b"voter-weight-record", voter.as_ref()],
            &vsr_program,
        )
        .0;
        assert_eq!(vsr.voter_weight_record_address(&mint), Some(expected));

        let nft = assemble_voting_client(realm(), &active(PluginFamily::Nft), voter, Vec::new());
        let nft_program = PluginFamily::Nft.canonical_program_id().unwrap();
        let expected = Pubkey::find_program_address(
            &[b"voter-weight-record", nft.realm().pubkey.as_ref(), mint.as_ref(), voter.as_ref()],
            &nft_program,
        )
        .0;
        assert_eq!(nft.voter_weight_record_address(&mint), Some(expected));

        let pyth = assemble_voting_client(realm(), &active(PluginFamily::Pyth), voter, Vec::new());
        assert!(pyth.is_plugin_active());
        assert_eq!(pyth.voter_weight_record_address(&mint), None);
    }
}
