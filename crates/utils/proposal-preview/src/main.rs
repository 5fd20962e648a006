//! # Proposal Preview Utility
//!
//! Runs the proposal-creation pipeline against a live cluster without writing
//! anything: reads the realm, resolves the voter's acting record and voting
//! plugin, and prints the address the proposal would be created at.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package proposal-preview --bin proposal_preview -- \
//!     <realm> <governance> <voter> [governing_mint]
//! ```
//!
//! `governing_mint` defaults to the realm's community mint. The title comes
//! from `PROPOSAL_TITLE` and the connection settings from the usual
//! `SOLANA_NETWORK` / `SOLANA_RPC_URL` / `DAS_RPC_URL` variables.

use lib_core::config::{core_config, init_config};
use lib_governance::{
    AccountFetcher, CreateProposalArgs, DasNftSource, DryRunSubmitter, ProgramPluginProvider, ProposalCreator,
    ReadonlyWallet, RpcAccountFetcher, RpcContext,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "usage: proposal_preview <realm> <governance> <voter> [governing_mint]";

fn init_logging() -> String {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => tracing_subscriber::EnvFilter::new(&log_level),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    log_level
}

fn parse_pubkey(value: Option<String>, name: &str) -> anyhow::Result<Pubkey> {
    let value = value.ok_or_else(|| anyhow::anyhow!("missing <{}>\n{}", name, USAGE))?;
    Pubkey::from_str(&value).map_err(|e| anyhow::anyhow!("invalid {} '{}': {}", name, value, e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_level = init_logging();
    info!("Proposal preview starting (log level {})", log_level);

    init_config()?;
    let config = core_config();

    let mut args = std::env::args().skip(1);
    let realm = parse_pubkey(args.next(), "realm")?;
    let governance = parse_pubkey(args.next(), "governance")?;
    let voter = parse_pubkey(args.next(), "voter")?;
    let requested_mint = args.next().map(|m| parse_pubkey(Some(m), "governing_mint")).transpose()?;

    let program_id = Pubkey::from_str(&config.governance_program_id)
        .map_err(|e| anyhow::anyhow!("invalid governance program id: {}", e))?;

    // region: --- Collaborators

    let connection = Arc::new(RpcClient::new(config.rpc_url.clone()));
    let fetcher = Arc::new(RpcAccountFetcher::from_client(Arc::clone(&connection)));
    let plugins = Arc::new(ProgramPluginProvider::new(fetcher.clone()));
    let nfts = Arc::new(DasNftSource::new(config.das_url.clone(), config.cluster)?);

    let creator = ProposalCreator::new(fetcher.clone(), plugins, nfts, Arc::new(DryRunSubmitter));

    // endregion: --- Collaborators

    let realm_account = fetcher.get_realm(&realm).await?;
    info!("Realm: {} ({})", realm_account.account.name, realm);

    let community_mint = realm_account.account.community_mint;
    let proposal = creator
        .create_proposal(CreateProposalArgs {
            context: RpcContext {
                connection,
                wallet: Arc::new(ReadonlyWallet(voter)),
                program_id,
            },
            cluster: config.cluster,
            realm,
            governance,
            governing_token_mint: requested_mint.unwrap_or(community_mint),
            community_token_mint: Some(community_mint),
            council_token_mint: realm_account.account.council_mint,
            title: lib_utils::get_env_or("PROPOSAL_TITLE", "Proposal preview"),
            description: String::new(),
            instructions: Vec::new(),
            is_draft: true,
            callbacks: None,
        })
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e.code()))?;

    println!("{}", proposal);
    Ok(())
}
