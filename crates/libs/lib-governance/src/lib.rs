//! # Governance Library
//!
//! Client-side proposal creation for SPL governance realms: ledger reads,
//! voter-weight plugin resolution, NFT voting eligibility and proposal assembly.

pub mod accounts;
pub mod fetcher;
pub mod nft;
pub mod plugins;
pub mod proposal;
pub mod submit;
pub mod voting_client;

// Re-export commonly used types from root for convenience
pub use accounts::{Governance, ProgramAccount, Realm, RealmConfigAccount, TokenOwnerRecord};
pub use fetcher::{AccountFetcher, RpcAccountFetcher};
pub use nft::{DasNftSource, Nft, NftSource};
pub use plugins::{PluginClientProvider, PluginFamily, PluginResolution, ProgramPluginProvider};
pub use proposal::{CreateProposalArgs, ProposalCreator, ProposalInstruction};
pub use submit::{DryRunSubmitter, ProposalSubmitter, ReadonlyWallet, RpcContext, WalletSigner};
pub use voting_client::VotingClient;
