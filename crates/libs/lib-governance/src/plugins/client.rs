//! # Plugin Client
//!
//! Handles bound to one voter-weight plugin program. The pipeline never builds
//! these itself; they come from a [`PluginClientProvider`](super::provider::PluginClientProvider).

use lib_core::Cluster;
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::registry::PluginFamily;

/// Client for one voter-weight plugin program.
pub trait PluginClient: Send + Sync + fmt::Debug {
    /// Family the client belongs to
    fn family(&self) -> PluginFamily;

    /// Deployed plugin program
    fn program_id(&self) -> Pubkey;

    /// The same client acting through `program_id`, another deployment of its family.
    fn bind(&self, program_id: Pubkey) -> Arc<dyn PluginClient>;
}

/// Plugin client identified by its program id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginProgram {
    pub family: PluginFamily,
    pub program_id: Pubkey,
    pub cluster: Cluster,
}

impl PluginClient for PluginProgram {
    fn family(&self) -> PluginFamily {
        self.family
    }

    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn bind(&self, program_id: Pubkey) -> Arc<dyn PluginClient> {
        Arc::new(PluginProgram {
            program_id,
            ..self.clone()
        })
    }
}

/// One optional client per plugin family.
#[derive(Debug, Clone, Default)]
pub struct PluginClients {
    pub vsr: Option<Arc<dyn PluginClient>>,
    pub nft: Option<Arc<dyn PluginClient>>,
    pub gateway: Option<Arc<dyn PluginClient>>,
    pub pyth: Option<Arc<dyn PluginClient>>,
}

impl PluginClients {
    pub fn get(&self, family: PluginFamily) -> Option<Arc<dyn PluginClient>> {
        match family {
            PluginFamily::Vsr => self.vsr.clone(),
            PluginFamily::Nft => self.nft.clone(),
            PluginFamily::Gateway => self.gateway.clone(),
            PluginFamily::Pyth => self.pyth.clone(),
        }
    }

    pub fn set(&mut self, family: PluginFamily, client: Option<Arc<dyn PluginClient>>) {
        match family {
            PluginFamily::Vsr => self.vsr = client,
            PluginFamily::Nft => self.nft = client,
            PluginFamily::Gateway => self.gateway = client,
            PluginFamily::Pyth => self.pyth = client,
        }
    }

    /// Families with a client available.
    pub fn available(&self) -> Vec<PluginFamily> {
        super::registry::RESOLUTION_ORDER
            .into_iter()
            .filter(|family| self.get(*family).is_some())
            .collect()
    }
}

/// Plugin errors. These never reach callers of the pipeline: a failing plugin
/// is logged and treated as absent.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Plugin program not deployed: {0}")]
    NotDeployed(String),

    #[error("Invalid program ID: {0}")]
    InvalidProgramId(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}
