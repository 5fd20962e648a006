//! # Account Fetcher
//!
//! Ledger reads used by the proposal pipeline.
//!
//! [`AccountFetcher`] only requires a raw account lookup; the typed getters are
//! provided on top of it and may be overridden (test doubles do). Lookups
//! distinguish a missing account (`Ok(None)`) from a transport failure (`Err`),
//! which lets callers treat the two differently.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_governance::fetcher::{AccountFetcher, RpcAccountFetcher};
//! use solana_sdk::pubkey::Pubkey;
//!
//! # async fn example(realm: Pubkey) -> lib_core::Result<()> {
//! let fetcher = RpcAccountFetcher::new("https://api.devnet.solana.com".to_string());
//! let realm = fetcher.get_realm(&realm).await?;
//! println!("Realm: {}", realm.account.name);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use lib_core::{AppError, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, info};

use crate::accounts::layout::{decode_governance, decode_realm, decode_token_owner_record};
use crate::accounts::pda::token_owner_record_address;
use crate::accounts::{Governance, ProgramAccount, Realm, TokenOwnerRecord};

/// Raw account contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountData {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Ledger account access.
#[async_trait]
pub trait AccountFetcher: Send + Sync {
    /// Raw account at `address`, `Ok(None)` if it does not exist.
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<AccountData>>;

    /// Fetch and decode a governance. A missing account is an error.
    async fn get_governance(&self, address: &Pubkey) -> Result<ProgramAccount<Governance>> {
        let raw = self
            .get_account_data(address)
            .await?
            .ok_or_else(|| AppError::Precondition(format!("Governance {} does not exist", address)))?;

        Ok(ProgramAccount {
            pubkey: *address,
            owner: raw.owner,
            account: decode_governance(&raw.data)?,
        })
    }

    /// Fetch and decode a realm. A missing account is an error.
    async fn get_realm(&self, address: &Pubkey) -> Result<ProgramAccount<Realm>> {
        let raw = self
            .get_account_data(address)
            .await?
            .ok_or_else(|| AppError::Precondition(format!("Realm {} does not exist", address)))?;

        Ok(ProgramAccount {
            pubkey: *address,
            owner: raw.owner,
            account: decode_realm(&raw.data)?,
        })
    }

    /// Fetch the token owner record of `owner` for `governing_token_mint`.
    async fn get_token_owner_record(
        &self,
        program_id: &Pubkey,
        realm: &Pubkey,
        governing_token_mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Option<ProgramAccount<TokenOwnerRecord>>> {
        let address = token_owner_record_address(program_id, realm, governing_token_mint, owner);

        let Some(raw) = self.get_account_data(&address).await? else {
            debug!("No token owner record at {}", address);
            return Ok(None);
        };

        Ok(Some(ProgramAccount {
            pubkey: address,
            owner: raw.owner,
            account: decode_token_owner_record(&raw.data)?,
        }))
    }
}

/// [`AccountFetcher`] backed by the Solana JSON-RPC API.
pub struct RpcAccountFetcher {
    rpc: Arc<RpcClient>,
}

impl RpcAccountFetcher {
    /// Create a fetcher for `rpc_url`. The connection is lazy.
    pub fn new(rpc_url: String) -> Self {
        info!("🔗 Connecting to Solana RPC: {}", rpc_url);
        Self {
            rpc: Arc::new(RpcClient::new(rpc_url)),
        }
    }

    /// Share an existing client.
    pub fn from_client(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> Arc<RpcClient> {
        Arc::clone(&self.rpc)
    }
}

#[async_trait]
impl AccountFetcher for RpcAccountFetcher {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<AccountData>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await
            .map_err(|e| AppError::Rpc(format!("Failed to fetch account {}: {}", address, e)))?;

        Ok(response.value.map(|account| AccountData {
            owner: account.owner,
            data: account.data,
        }))
    }
}
