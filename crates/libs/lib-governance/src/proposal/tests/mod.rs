//! # Proposal Pipeline Tests
//!
//! In-memory ledger and collaborator fakes shared by the pipeline tests.


use super::*;
use crate::accounts::layout::{
    GovernanceConfigLayout, GovernanceLayout, GoverningTokenConfigLayout, MintMaxVoterWeightSourceLayout,
    RealmConfigLayout, RealmInnerConfigLayout, RealmLayout, TokenOwnerRecordLayout, VoteThresholdLayout, GOVERNANCE_V2,
    REALM_CONFIG, REALM_V2, TOKEN_OWNER_RECORD_V2,
};
use crate::accounts::pda::{realm_config_address, registrar_address, token_owner_record_address};
use crate::fetcher::{AccountData, AccountFetcher};
use crate::nft::registrar::tests::encode_registrar;
use crate::nft::{Nft, NftCollection, NftCreator, NftSource};
use crate::plugins::{PluginClientProvider, PluginClients, PluginFamily, PluginProgram};
use crate::submit::{ProposalRequest, ProposalSubmitter, ReadonlyWallet, RpcContext};
use async_trait::async_trait;
use borsh::BorshSerialize;
use lib_core::{AppError, Cluster};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// region: --- Fakes

/// Ledger held in memory. Addresses in `failing` return a transport error.
#[derive(Default)]
pub struct FakeLedger {
    accounts: HashMap<Pubkey, AccountData>,
    failing: HashSet<Pubkey>,
    reads: AtomicUsize,
}

impl FakeLedger {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountFetcher for FakeLedger {
    async fn get_account_data(&self, address: &Pubkey) -> lib_core::Result<Option<AccountData>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(address) {
            return Err(AppError::Rpc(format!("connection reset reading {}", address)));
        }
        Ok(self.accounts.get(address).cloned())
    }
}

/// Provider returning a fixed set of clients, or failing.
pub struct FakePlugins {
    clients: Option<PluginClients>,
    calls: AtomicUsize,
}

impl FakePlugins {
    pub fn with(families: &[PluginFamily]) -> Self {
        let mut clients = PluginClients::default();
        for family in families {
            clients.set(*family, Some(plugin(*family)));
        }
        Self {
            clients: Some(clients),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            clients: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PluginClientProvider for FakePlugins {
    async fn fetch_plugins(&self, _cluster: Cluster, _wallet: &Pubkey) -> anyhow::Result<PluginClients> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.clients
            .clone()
            .ok_or_else(|| anyhow::anyhow!("plugin provider offline"))
    }
}

/// Wallet NFTs keyed by owner, or an unreachable indexer.
#[derive(Default)]
pub struct FakeNfts {
    held: Vec<Nft>,
    offline: bool,
    calls: AtomicUsize,
}

impl FakeNfts {
    pub fn holding(held: Vec<Nft>) -> Self {
        Self {
            held,
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NftSource for FakeNfts {
    async fn get_nfts(&self, _owner: &Pubkey, _cluster: Cluster) -> anyhow::Result<Vec<Nft>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            anyhow::bail!("DAS request failed: 503 Service Unavailable");
        }
        Ok(self.held.clone())
    }
}

/// Submitter that records requests instead of writing them.
#[derive(Default)]
pub struct RecordingSubmitter {
    requests: Mutex<Vec<ProposalRequest>>,
    reject: bool,
}

impl RecordingSubmitter {
    pub fn rejecting() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> ProposalRequest {
        self.requests.lock().unwrap().last().cloned().expect("no submission recorded")
    }
}

#[async_trait]
impl ProposalSubmitter for RecordingSubmitter {
    async fn submit(&self, context: &RpcContext, request: ProposalRequest) -> anyhow::Result<Pubkey> {
        let proposal = crate::accounts::pda::proposal_address(
            &context.program_id,
            &request.governance,
            &request.governing_token_mint,
            request.proposal_index,
        );
        self.requests.lock().unwrap().push(request);

        if self.reject {
            anyhow::bail!("Transaction simulation failed: custom program error 0x1f5");
        }
        Ok(proposal)
    }
}

// endregion: --- Fakes

// region: --- Ledger fixtures

fn encode<T: BorshSerialize>(value: &T) -> Vec<u8> {
    borsh::to_vec(value).unwrap()
}

fn token_config(addin: Option<Pubkey>) -> GoverningTokenConfigLayout {
    GoverningTokenConfigLayout {
        voter_weight_addin: addin.map(|a| a.to_bytes()),
        max_voter_weight_addin: None,
        token_type: 0,
        reserved: [0; 8],
    }
}

pub fn plugin(family: PluginFamily) -> Arc<dyn crate::plugins::PluginClient> {
    Arc::new(PluginProgram {
        family,
        program_id: family.canonical_program_id().unwrap(),
        cluster: Cluster::Mainnet,
    })
}

/// A realm with a community and council mint and one governance.
pub struct Scenario {
    pub program_id: Pubkey,
    pub realm: Pubkey,
    pub governance: Pubkey,
    pub community_mint: Pubkey,
    pub council_mint: Pubkey,
    pub voter: Pubkey,
    pub ledger: FakeLedger,
}

impl Scenario {
    /// Realm and governance (with `proposal_count`) exist; nothing else does.
    pub fn new(proposal_count: u32) -> Self {
        let mut scenario = Self {
            program_id: lib_core::config::DEFAULT_GOVERNANCE_PROGRAM_ID.parse().unwrap(),
            realm: Pubkey::new_unique(),
            governance: Pubkey::new_unique(),
            community_mint: Pubkey::new_unique(),
            council_mint: Pubkey::new_unique(),
            voter: Pubkey::new_unique(),
            ledger: FakeLedger::default(),
        };

        let realm = RealmLayout {
            account_type: REALM_V2,
            community_mint: scenario.community_mint.to_bytes(),
            config: RealmInnerConfigLayout {
                legacy1: 0,
                legacy2: 0,
                reserved: [0; 6],
                min_community_weight_to_create_governance: 1,
                community_mint_max_voter_weight_source: MintMaxVoterWeightSourceLayout::SupplyFraction(10_000_000_000),
                council_mint: Some(scenario.council_mint.to_bytes()),
            },
            reserved: [0; 6],
            legacy1: 0,
            authority: None,
            name: "Mango DAO".to_string(),
        };
        scenario.put(scenario.realm, encode(&realm));

        let governance = GovernanceLayout {
            account_type: GOVERNANCE_V2,
            realm: scenario.realm.to_bytes(),
            governed_account: Pubkey::new_unique().to_bytes(),
            proposal_count,
            config: GovernanceConfigLayout {
                community_vote_threshold: VoteThresholdLayout::YesVotePercentage(60),
                min_community_weight_to_create_proposal: 1,
                min_transaction_hold_up_time: 86_400,
                voting_base_time: 259_200,
            },
        };
        scenario.put(scenario.governance, encode(&governance));

        scenario
    }

    fn put(&mut self, address: Pubkey, data: Vec<u8>) {
        self.ledger.accounts.insert(
            address,
            AccountData {
                owner: self.program_id,
                data,
            },
        );
    }

    pub fn record_address(&self, mint: &Pubkey) -> Pubkey {
        token_owner_record_address(&self.program_id, &self.realm, mint, &self.voter)
    }

    /// Give the voter a deposit for `mint`.
    pub fn with_record(&mut self, mint: Pubkey) -> &mut Self {
        let record = TokenOwnerRecordLayout {
            account_type: TOKEN_OWNER_RECORD_V2,
            realm: self.realm.to_bytes(),
            governing_token_mint: mint.to_bytes(),
            governing_token_owner: self.voter.to_bytes(),
            governing_token_deposit_amount: 1_000,
        };
        let address = self.record_address(&mint);
        self.put(address, encode(&record));
        self
    }

    /// Create the realm config account with a community voter-weight addin.
    pub fn with_addin(&mut self, addin: Option<Pubkey>) -> &mut Self {
        let config = RealmConfigLayout {
            account_type: REALM_CONFIG,
            realm: self.realm.to_bytes(),
            community_token_config: token_config(addin),
            council_token_config: token_config(None),
        };
        let address = realm_config_address(&self.program_id, &self.realm);
        self.put(address, encode(&config));
        self
    }

    /// Create the NFT plugin registrar listing `collections`.
    pub fn with_registrar(&mut self, collections: &[Pubkey]) -> &mut Self {
        let nft_program = PluginFamily::Nft.canonical_program_id().unwrap();
        self.with_registrar_under(nft_program, collections)
    }

    /// Create the registrar listing `collections` under a given NFT plugin deployment.
    pub fn with_registrar_under(&mut self, nft_program: Pubkey, collections: &[Pubkey]) -> &mut Self {
        let address = registrar_address(&self.realm, &self.community_mint, &nft_program);
        self.put(address, encode_registrar(collections));
        self
    }

    /// Store `data` where the NFT plugin registrar lives.
    pub fn with_raw_registrar(&mut self, data: Vec<u8>) -> &mut Self {
        let nft_program = PluginFamily::Nft.canonical_program_id().unwrap();
        let address = registrar_address(&self.realm, &self.community_mint, &nft_program);
        self.put(address, data);
        self
    }

    /// Make reads of `address` fail with a transport error.
    pub fn failing(&mut self, address: Pubkey) -> &mut Self {
        self.ledger.failing.insert(address);
        self
    }

    /// Wire the pipeline over this scenario's ledger. The ledger moves into the harness.
    pub fn harness(&mut self, plugins: FakePlugins, nfts: FakeNfts, submitter: RecordingSubmitter) -> Harness {
        Harness::new(std::mem::take(&mut self.ledger), plugins, nfts, submitter)
    }

    pub fn context(&self) -> RpcContext {
        RpcContext {
            connection: Arc::new(RpcClient::new("http://127.0.0.1:8899".to_string())),
            wallet: Arc::new(ReadonlyWallet(self.voter)),
            program_id: self.program_id,
        }
    }

    pub fn args(&self, governing_token_mint: Pubkey, instructions: Vec<ProposalInstruction>) -> CreateProposalArgs {
        CreateProposalArgs {
            context: self.context(),
            cluster: Cluster::Mainnet,
            realm: self.realm,
            governance: self.governance,
            governing_token_mint,
            community_token_mint: Some(self.community_mint),
            council_token_mint: Some(self.council_mint),
            title: "Fund Q3 grants".to_string(),
            description: "Move 50k USDC to the grants multisig".to_string(),
            instructions,
            is_draft: false,
            callbacks: None,
        }
    }
}

/// Pipeline wired to fakes, with handles to inspect them.
pub struct Harness {
    pub ledger: Arc<FakeLedger>,
    pub plugins: Arc<FakePlugins>,
    pub nfts: Arc<FakeNfts>,
    pub submitter: Arc<RecordingSubmitter>,
    pub creator: ProposalCreator,
}

impl Harness {
    pub fn new(ledger: FakeLedger, plugins: FakePlugins, nfts: FakeNfts, submitter: RecordingSubmitter) -> Self {
        let ledger = Arc::new(ledger);
        let plugins = Arc::new(plugins);
        let nfts = Arc::new(nfts);
        let submitter = Arc::new(submitter);
        let creator = ProposalCreator::new(ledger.clone(), plugins.clone(), nfts.clone(), submitter.clone());

        Self {
            ledger,
            plugins,
            nfts,
            submitter,
            creator,
        }
    }
}

// endregion: --- Ledger fixtures

// region: --- Instructions and NFTs

pub fn memo(text: &str) -> ProposalInstruction {
    Instruction {
        program_id: "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr".parse().unwrap(),
        accounts: vec![AccountMeta::new_readonly(Pubkey::new_unique(), true)],
        data: text.as_bytes().to_vec(),
    }
    .into()
}

pub fn oversized() -> ProposalInstruction {
    Instruction {
        program_id: Pubkey::new_unique(),
        accounts: vec![],
        data: vec![7; 4_096],
    }
    .into()
}

pub fn nft_in(collection: Pubkey, verified_collection: Option<bool>, verified_creator: bool) -> Nft {
    Nft {
        mint: Pubkey::new_unique(),
        name: format!("Member of {}", collection),
        collection: Some(NftCollection {
            mint_address: Some(collection),
            verified: verified_collection,
        }),
        creators: vec![NftCreator {
            address: Pubkey::new_unique(),
            verified: verified_creator,
            share: 100,
        }],
    }
}

// endregion: --- Instructions and NFTs
