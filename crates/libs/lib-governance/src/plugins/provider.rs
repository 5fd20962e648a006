//! # Plugin Client Provider
//!
//! Supplies the per-family plugin clients. Providers are handed to the pipeline
//! explicitly, so any caching they do stays visible to the caller.

use async_trait::async_trait;
use lib_core::Cluster;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::client::{PluginClient, PluginClients, PluginError, PluginProgram};
use super::registry::{PluginFamily, RESOLUTION_ORDER};
use crate::fetcher::AccountFetcher;

/// Source of plugin clients for a cluster.
#[async_trait]
pub trait PluginClientProvider: Send + Sync {
    /// Clients for every family the provider can serve on `cluster`.
    ///
    /// `wallet` is the voter the clients act for.
    async fn fetch_plugins(&self, cluster: Cluster, wallet: &Pubkey) -> anyhow::Result<PluginClients>;
}

/// Provider that builds a [`PluginProgram`] per family, keeping only families
/// whose program is deployed on the cluster. Results are cached per cluster
/// unless a deployment check failed in transport.
pub struct ProgramPluginProvider {
    fetcher: Arc<dyn AccountFetcher>,
    cache: RwLock<HashMap<Cluster, PluginClients>>,
}

impl ProgramPluginProvider {
    pub fn new(fetcher: Arc<dyn AccountFetcher>) -> Self {
        Self {
            fetcher,
            cache: RwLock::new(HashMap::new()),
        }
    }

    async fn load_family(
        &self,
        cluster: Cluster,
        family: PluginFamily,
    ) -> Result<Arc<dyn PluginClient>, PluginError> {
        let program_id = family.canonical_program_id().ok_or_else(|| {
            PluginError::InvalidProgramId(format!("no valid program id for {}", family))
        })?;

        let account = self
            .fetcher
            .get_account_data(&program_id)
            .await
            .map_err(|e| PluginError::NetworkError(e.to_string()))?;

        if account.is_none() {
            return Err(PluginError::NotDeployed(format!("{} on {}", program_id, cluster)));
        }

        Ok(Arc::new(PluginProgram {
            family,
            program_id,
            cluster,
        }))
    }

    /// Drop cached clients so the next call re-checks deployments.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}

#[async_trait]
impl PluginClientProvider for ProgramPluginProvider {
    async fn fetch_plugins(&self, cluster: Cluster, wallet: &Pubkey) -> anyhow::Result<PluginClients> {
        if let Some(clients) = self.cache.read().await.get(&cluster) {
            debug!("Plugin clients for {} served from cache", cluster);
            return Ok(clients.clone());
        }

        let mut clients = PluginClients::default();
        let mut transient = false;
        for family in RESOLUTION_ORDER {
            match self.load_family(cluster, family).await {
                Ok(client) => clients.set(family, Some(client)),
                Err(e) => {
                    transient |= matches!(e, PluginError::NetworkError(_));
                    warn!("{} plugin client unavailable: {}", family, e);
                }
            }
        }

        info!(
            "Plugin clients for {} (wallet {}): {:?}",
            cluster,
            wallet,
            clients.available()
        );

        // Only confirmed deployments are cached; a failed lookup is retried next call.
        if transient {
            debug!("Plugin clients for {} not cached after a lookup failure", cluster);
        } else {
            self.cache.write().await.insert(cluster, clients.clone());
        }
        Ok(clients)
    }
}
