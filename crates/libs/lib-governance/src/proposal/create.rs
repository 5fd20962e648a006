//! # Proposal Creation
//!
//! Orchestrates one proposal creation for a voter:
//!
//! 1. Fetch governance, realm, realm config and the voter's token owner records
//!    concurrently
//! 2. Pick the acting record (`NoVotingPower` when there is none)
//! 3. Serialize the instructions, all or nothing
//! 4. Resolve the realm's voter-weight plugin and, for NFT voting, the voter's
//!    eligible NFTs
//! 5. Hand the assembled request to the submitter
//!
//! Nothing is written before step 5, so every earlier failure leaves the
//! ledger untouched.

use lib_core::{AppError, Cluster, Result};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::assembler::{load_realm_config, optional_token_owner_record, select_acting_record, validate_title};
use super::instruction::{serialize_instructions, ProposalInstruction};
use crate::fetcher::AccountFetcher;
use crate::nft::{NftEligibilityEvaluator, NftSource};
use crate::plugins::{resolve_plugin, PluginClientProvider, PluginClients, PluginFamily, PluginResolution};
use crate::submit::{ProposalRequest, ProposalSubmitter, RpcContext, SubmissionCallbacks};
use crate::voting_client::assemble_voting_client;

/// Inputs of one proposal creation.
#[derive(Clone)]
pub struct CreateProposalArgs {
    /// Connection, wallet and governance program the proposal is written with
    pub context: RpcContext,
    pub cluster: Cluster,
    pub realm: Pubkey,
    pub governance: Pubkey,
    pub governing_token_mint: Pubkey,
    pub community_token_mint: Option<Pubkey>,
    pub council_token_mint: Option<Pubkey>,
    pub title: String,
    pub description: String,
    pub instructions: Vec<ProposalInstruction>,
    pub is_draft: bool,
    pub callbacks: Option<Arc<dyn SubmissionCallbacks>>,
}

/// Creates proposals using explicitly provided collaborators.
pub struct ProposalCreator {
    fetcher: Arc<dyn AccountFetcher>,
    plugins: Arc<dyn PluginClientProvider>,
    nfts: Arc<dyn NftSource>,
    submitter: Arc<dyn ProposalSubmitter>,
}

impl ProposalCreator {
    pub fn new(
        fetcher: Arc<dyn AccountFetcher>,
        plugins: Arc<dyn PluginClientProvider>,
        nfts: Arc<dyn NftSource>,
        submitter: Arc<dyn ProposalSubmitter>,
    ) -> Self {
        Self {
            fetcher,
            plugins,
            nfts,
            submitter,
        }
    }

    /// Create a proposal and return its address.
    pub async fn create_proposal(&self, args: CreateProposalArgs) -> Result<Pubkey> {
        validate_title(&args.title)?;

        let fetcher = self.fetcher.as_ref();
        let program_id = args.context.program_id;
        let voter = args.context.wallet_pubkey();

        info!("Creating proposal '{}' on governance {} for {}", args.title, args.governance, voter);

        // region: --- Ledger reads

        let (governance, realm, realm_config, requested_record, council_record, community_record) = tokio::join!(
            fetcher.get_governance(&args.governance),
            fetcher.get_realm(&args.realm),
            load_realm_config(fetcher, &program_id, &args.realm),
            optional_token_owner_record(fetcher, &program_id, &args.realm, Some(&args.governing_token_mint), &voter),
            optional_token_owner_record(fetcher, &program_id, &args.realm, args.council_token_mint.as_ref(), &voter),
            optional_token_owner_record(fetcher, &program_id, &args.realm, args.community_token_mint.as_ref(), &voter),
        );

        let governance = governance.map_err(|e| required("governance", e))?;
        let realm = realm.map_err(|e| required("realm", e))?;
        let realm_config = realm_config.map_err(|e| required("realm config", e))?;

        // endregion: --- Ledger reads

        let acting_record = select_acting_record(requested_record, community_record, council_record)?;
        debug!(
            "Acting token owner record {} (mint {})",
            acting_record.pubkey, acting_record.account.governing_token_mint
        );

        let instructions = serialize_instructions(&governance, &args.instructions)?;
        let proposal_index = governance.account.proposal_count;

        // region: --- Voting power

        let clients = match self.plugins.fetch_plugins(args.cluster, &voter).await {
            Ok(clients) => clients,
            Err(e) => {
                warn!("Plugin clients unavailable, using base voting power: {}", e);
                PluginClients::default()
            }
        };

        let addin = realm_config.community_token_config.voter_weight_addin;
        let resolution = resolve_plugin(addin.as_ref(), &clients);

        let eligible_nfts = match &resolution {
            PluginResolution::Active(client) if client.family() == PluginFamily::Nft => {
                let community_mint = args.community_token_mint.unwrap_or(realm.account.community_mint);
                let evaluator = NftEligibilityEvaluator {
                    fetcher,
                    source: self.nfts.as_ref(),
                    cluster: args.cluster,
                };
                evaluator
                    .eligible_nfts(&realm.pubkey, &community_mint, client.as_ref(), &voter)
                    .await
            }
            _ => Vec::new(),
        };

        let voting_client = assemble_voting_client(realm.clone(), &resolution, voter, eligible_nfts);

        // endregion: --- Voting power

        let request = ProposalRequest {
            realm,
            governance: args.governance,
            token_owner_record: acting_record,
            title: args.title,
            description: args.description,
            governing_token_mint: args.governing_token_mint,
            proposal_index,
            instructions,
            is_draft: args.is_draft,
            voting_client,
            callbacks: args.callbacks,
        };

        let proposal = self
            .submitter
            .submit(&args.context, request)
            .await
            .map_err(|e| AppError::Submission(e.to_string()))?;

        info!("✅ Proposal #{} created at {}", proposal_index, proposal);
        Ok(proposal)
    }
}

/// Failure of a lookup the pipeline cannot proceed without.
fn required(what: &str, err: AppError) -> AppError {
    match err {
        AppError::Precondition(_) => err,
        other => AppError::Precondition(format!("Failed to load {}: {}", what, other)),
    }
}
